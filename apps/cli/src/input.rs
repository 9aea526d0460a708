//! JSON arguments given as a file path or inline text.

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Reads `input` as a file when one exists at that path, else parses it as JSON.
pub fn read_json(input: &str) -> anyhow::Result<Value> {
    let path = Path::new(input);
    if path.is_file() {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", path.display()));
    }
    serde_json::from_str(input)
        .with_context(|| format!("'{input}' is neither a readable file nor valid JSON"))
}

/// [`read_json`] followed by deserialization into `T`.
pub fn read_as<T: DeserializeOwned>(input: &str, what: &str) -> anyhow::Result<T> {
    serde_json::from_value(read_json(input)?).with_context(|| format!("invalid {what}"))
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

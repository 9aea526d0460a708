//! Command implementations for the Dealflow CLI.

pub mod agents;
pub mod pipeline;
pub mod run;
pub mod scoring;
pub mod workflow;

use std::process::ExitCode;

pub(crate) const fn exit_code(success: bool) -> ExitCode {
    if success { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

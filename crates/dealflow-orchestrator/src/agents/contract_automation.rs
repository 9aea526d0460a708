//! Contract drafting.
//!
//! Deal terms are gathered deterministically from the task; only the legal
//! text is produced by the generator. When the task carries a `context`
//! object (as the lead-to-contract pipeline supplies), its figures are
//! summarized into the prompt.

use super::support::{draft, to_payload};
use crate::{Agent, AgentError, CONTEXT_KEY, Payload, Task};
use async_trait::async_trait;
use dealflow_abstraction::{GenerationParameters, TextGenerator};
use dealflow_core::Settings;
use dealflow_core::record::{format_usd, get_f64, get_string};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: u32 = 3000;
const SYSTEM_PROMPT: &str = "You draft plain-language real estate contracts. Mark every \
                             blank the parties must complete with [BRACKETS].";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Generate,
    Amend,
}

impl Action {
    fn parse(label: Option<&str>) -> Option<Self> {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            None | Some("generate") => Some(Self::Generate),
            Some("amend") => Some(Self::Amend),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct PurchaseTerms {
    buyer_name: String,
    seller_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    offer_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    earnest_money: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    closing_date: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContractDraft {
    action: &'static str,
    contract_type: &'static str,
    state: String,
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    contract_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    terms: Option<PurchaseTerms>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    changes: Vec<String>,
    context_used: bool,
    document: String,
    review_required: bool,
    model: String,
    tokens_used: u64,
}

/// Drafts purchase agreements and amendments through the text generator.
pub struct ContractAutomationAgent {
    settings: Arc<Settings>,
    generator: Arc<dyn TextGenerator>,
}

impl ContractAutomationAgent {
    #[must_use]
    pub fn new(settings: Arc<Settings>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { settings, generator }
    }
}

/// One line per figure found in a pipeline context.
fn summarize_context(context: &Map<String, Value>) -> Vec<String> {
    let section = |key: &str| context.get(key).and_then(Value::as_object);
    let mut lines = Vec::new();

    if let Some(market) = section("market_analysis") {
        if let Some(rating) = get_string(market, "investment_rating") {
            lines.push(format!("Market rating: {rating}"));
        }
        if let Some(score) = get_f64(market, "property_score") {
            lines.push(format!("Market score: {score}"));
        }
    }
    if let Some(total) = section("rehab_estimate").and_then(|r| get_f64(r, "total_cost")) {
        lines.push(format!("Estimated rehab: {}", format_usd(total)));
    }
    if let Some(lender) =
        section("financing").and_then(|f| get_string(f, "recommended_lender"))
    {
        lines.push(format!("Financing through: {lender}"));
    }
    lines
}

fn changes(task: &Task) -> Result<Vec<String>, AgentError> {
    let changes = match task.get("changes") {
        Some(Value::String(change)) => vec![change.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };
    if changes.iter().all(|c| c.trim().is_empty()) {
        return Err(AgentError::InvalidInput(
            "amend requires 'changes' as a string or list of strings".to_string(),
        ));
    }
    Ok(changes)
}

impl ContractAutomationAgent {
    async fn write(&self, prompt: &str) -> Result<(String, String, u64), AgentError> {
        let parameters =
            GenerationParameters::new(TEMPERATURE, MAX_TOKENS).with_system(SYSTEM_PROMPT);
        let generation = draft(
            self.generator.as_ref(),
            prompt,
            parameters,
            self.settings.runtime.generator_timeout(),
        )
        .await?;
        let model = generation
            .model_id
            .clone()
            .unwrap_or_else(|| self.generator.generator_id().to_string());
        let tokens = generation.total_tokens();
        Ok((generation.content, model, tokens))
    }

    async fn generate(
        &self,
        task: &Task,
        state: String,
        address: String,
    ) -> Result<ContractDraft, AgentError> {
        let terms = PurchaseTerms {
            buyer_name: task.string("buyer_name").unwrap_or_else(|| "[BUYER]".to_string()),
            seller_name: task.string("seller_name").unwrap_or_else(|| "[SELLER]".to_string()),
            offer_price: task.number("offer_price"),
            earnest_money: task.number("earnest_money"),
            closing_date: task.string("closing_date"),
        };
        let context = task.get(CONTEXT_KEY).and_then(Value::as_object);
        let context_lines = context.map(summarize_context).unwrap_or_default();

        let mut prompt = format!(
            "Draft a {state} residential purchase agreement for {address}\n\
             Buyer: {buyer}\n\
             Seller: {seller}\n\
             Purchase price: {price}\n\
             Earnest money: {earnest}\n\
             Closing date: {closing}\n\
             Include inspection, title and assignment clauses.",
            buyer = terms.buyer_name,
            seller = terms.seller_name,
            price = terms.offer_price.map_or_else(|| "[PRICE]".to_string(), format_usd),
            earnest = terms.earnest_money.map_or_else(|| "[EARNEST MONEY]".to_string(), format_usd),
            closing = terms.closing_date.as_deref().unwrap_or("[CLOSING DATE]"),
        );
        if !context_lines.is_empty() {
            prompt.push_str("\nDeal notes:\n");
            prompt.push_str(&context_lines.join("\n"));
        }

        let (document, model, tokens_used) = self.write(&prompt).await?;
        Ok(ContractDraft {
            action: "generate",
            contract_type: "purchase_agreement",
            state,
            address,
            contract_id: None,
            terms: Some(terms),
            changes: Vec::new(),
            context_used: context.is_some(),
            document,
            review_required: true,
            model,
            tokens_used,
        })
    }

    async fn amend(
        &self,
        task: &Task,
        state: String,
        address: String,
    ) -> Result<ContractDraft, AgentError> {
        let contract_id = task
            .string("contract_id")
            .ok_or_else(|| AgentError::InvalidInput("amend requires 'contract_id'".to_string()))?;
        let changes = changes(task)?;

        let listed: Vec<String> = changes.iter().map(|c| format!("- {c}")).collect();
        let prompt = format!(
            "Draft an amendment to contract {contract_id} for {address}, {state}\n\
             Changes:\n{}\n\
             All other terms of the original agreement remain in effect.",
            listed.join("\n"),
        );

        let (document, model, tokens_used) = self.write(&prompt).await?;
        Ok(ContractDraft {
            action: "amend",
            contract_type: "amendment",
            state,
            address,
            contract_id: Some(contract_id),
            terms: None,
            changes,
            context_used: false,
            document,
            review_required: true,
            model,
            tokens_used,
        })
    }
}

#[async_trait]
impl Agent for ContractAutomationAgent {
    fn name(&self) -> &str {
        "ContractAutomation"
    }

    fn description(&self) -> &str {
        "Drafts purchase agreements and amendments"
    }

    fn model(&self) -> &str {
        self.generator.generator_id()
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["state", "address"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let label = task.string("type");
        let action = Action::parse(label.as_deref()).ok_or_else(|| {
            AgentError::InvalidInput(format!("Unknown contract action: {}", label.unwrap_or_default()))
        })?;
        let state = task.string("state").unwrap_or_default().trim().to_uppercase();
        let address = task.string("address").unwrap_or_default();

        info!(action = ?action, state = %state, address = %address, "Drafting contract");

        let contract = match action {
            Action::Generate => self.generate(task, state, address).await?,
            Action::Amend => self.amend(task, state, address).await?,
        };
        to_payload(&contract)
    }
}

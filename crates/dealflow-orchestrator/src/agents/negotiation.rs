//! Seller communication templates.
//!
//! Messages are rendered from fixed templates so the same lead and offer
//! always produce the same text.

use super::support::to_payload;
use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use dealflow_core::record::{format_usd, get_f64, get_string};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

/// Days after which a follow-up moves from email to SMS.
const SMS_AFTER_DAYS: u32 = 7;
const DEFAULT_DAYS_SINCE_OFFER: u32 = 3;
const FOLLOWUP_INTERVAL_DAYS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interaction {
    InitialOffer,
    Followup,
    Objection,
    Negotiation,
}

impl Interaction {
    fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "initial_offer" => Some(Self::InitialOffer),
            "followup" | "follow_up" => Some(Self::Followup),
            "objection" => Some(Self::Objection),
            "negotiation" | "counter_offer" => Some(Self::Negotiation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Objection {
    Price,
    Timeline,
    Condition,
}

impl Objection {
    /// Unknown objections are answered as price objections.
    fn parse(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_lowercase()).as_deref() {
            Some("timeline") => Self::Timeline,
            Some("condition") => Self::Condition,
            _ => Self::Price,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Timeline => "timeline",
            Self::Condition => "condition",
        }
    }

    const fn subject(self) -> &'static str {
        match self {
            Self::Price => "What our offer means for your bottom line",
            Self::Timeline => "Closing on your schedule",
            Self::Condition => "No repairs needed before you sell",
        }
    }

    const fn body(self) -> &'static str {
        match self {
            Self::Price => {
                "Our offer reflects today's market, the property's current condition and a \
                 closing without financing contingencies.\n\nA listed sale typically costs \
                 around 6% in commissions plus closing costs and two to three months of \
                 carrying costs. Once those are subtracted, the net from a listing is often \
                 close to or below our number.\n\nCan we walk through the figures together \
                 on a short call?"
            }
            Self::Timeline => {
                "We can close in as little as 7 to 14 days, or later if that suits you \
                 better. A fixed date removes the risk of a buyer backing out after \
                 inspections and stops the monthly carrying costs.\n\nWhat date would work \
                 best for you?"
            }
            Self::Condition => {
                "You do not need to repair, clean or stage anything. We buy as-is, \
                 including properties with deferred maintenance, structural issues or \
                 inherited contents.\n\nWe take on the work after closing."
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct Message {
    interaction_type: &'static str,
    lead_id: String,
    message_type: &'static str,
    subject: String,
    body: String,
    #[serde(flatten)]
    details: Map<String, Value>,
}

/// Drafts seller messages for each stage of an acquisition conversation.
#[derive(Debug, Default)]
pub struct NegotiationAssistantAgent;

impl NegotiationAssistantAgent {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Seller-facing fields pulled from `lead_data` with fallbacks.
struct LeadView {
    seller: Option<String>,
    address: String,
    city: String,
    state: String,
    property_type: String,
    phone: Option<String>,
}

impl LeadView {
    fn from_task(task: &Task) -> Self {
        let empty = Map::new();
        let lead = task.get("lead_data").and_then(Value::as_object).unwrap_or(&empty);
        Self {
            seller: get_string(lead, "seller_name"),
            address: get_string(lead, "address").unwrap_or_default(),
            city: get_string(lead, "city").unwrap_or_default(),
            state: get_string(lead, "state").unwrap_or_default(),
            property_type: get_string(lead, "property_type")
                .unwrap_or_else(|| "residential".to_string()),
            phone: get_string(lead, "seller_phone"),
        }
    }
}

fn offer_price(task: &Task) -> Option<f64> {
    task.get("offer_data").and_then(Value::as_object).and_then(|o| get_f64(o, "offer_price"))
}

fn initial_offer(lead_id: String, lead: &LeadView, price: Option<f64>) -> Message {
    let price = price.map_or_else(|| "to be confirmed".to_string(), format_usd);
    let body = format!(
        "Dear {seller},\n\n\
         We are local investors who buy homes directly from owners, as-is and for cash.\n\n\
         Property: {address}, {city}, {state} ({property_type})\n\
         Purchase price: {price}\n\
         Closing: 7 to 14 days from acceptance\n\
         Repairs: none required\n\
         Closing costs: paid by us\n\n\
         There are no agent commissions and no financing contingencies.\n\n\
         If you would like to talk it over, reach us at {phone}.\n\n\
         Acquisitions Team",
        seller = lead.seller.as_deref().unwrap_or("Homeowner"),
        address = lead.address,
        city = lead.city,
        state = lead.state,
        property_type = lead.property_type,
        phone = lead.phone.as_deref().unwrap_or("the number below"),
    );

    let mut details = Map::new();
    details.insert("priority".to_string(), "high".into());
    details.insert("suggested_followup_days".to_string(), FOLLOWUP_INTERVAL_DAYS.into());

    Message {
        interaction_type: "initial_offer",
        lead_id,
        message_type: "email",
        subject: format!("A cash offer for {}", lead.address),
        body,
        details,
    }
}

fn followup(lead_id: String, lead: &LeadView, days_since_offer: u32) -> Message {
    let body = format!(
        "Hi {seller},\n\n\
         Checking in on the offer we sent for {address}. We are happy to go over the \
         numbers, adjust the closing date or answer any questions about the process.\n\n\
         Reply here or call {phone} whenever it suits you.\n\n\
         Acquisitions Team",
        seller = lead.seller.as_deref().unwrap_or("there"),
        address = lead.address,
        phone = lead.phone.as_deref().unwrap_or("us"),
    );

    let mut details = Map::new();
    details.insert("timing".to_string(), format!("Day {days_since_offer}").into());
    details.insert("suggested_followup_days".to_string(), FOLLOWUP_INTERVAL_DAYS.into());

    Message {
        interaction_type: "followup",
        lead_id,
        message_type: if days_since_offer > SMS_AFTER_DAYS { "sms" } else { "email" },
        subject: format!("Following up on our offer for {}", lead.address),
        body,
        details,
    }
}

fn objection(lead_id: String, objection: Objection) -> Message {
    let mut details = Map::new();
    details.insert("objection_type".to_string(), objection.as_str().into());

    Message {
        interaction_type: "objection_response",
        lead_id,
        message_type: "email",
        subject: objection.subject().to_string(),
        body: objection.body().to_string(),
        details,
    }
}

fn counter_offer(lead_id: String, lead: &LeadView, new_price: f64, previous: f64) -> Message {
    let body = format!(
        "Thank you for your patience while we reviewed everything.\n\n\
         Revised price: {price}\n\
         Closing: 10 business days\n\
         All other terms are unchanged.\n\n\
         This offer stands for 5 days. Let us know and we will start the paperwork.\n\n\
         Acquisitions Team",
        price = format_usd(new_price),
    );

    let mut details = Map::new();
    details.insert("new_offer_price".to_string(), new_price.into());
    details.insert("previous_offer".to_string(), previous.into());
    details.insert("price_increase".to_string(), (new_price - previous).into());
    details.insert("urgency".to_string(), "high".into());

    Message {
        interaction_type: "negotiation",
        lead_id,
        message_type: "email",
        subject: format!("Updated offer for {}", lead.address),
        body,
        details,
    }
}

#[async_trait]
impl Agent for NegotiationAssistantAgent {
    fn name(&self) -> &str {
        "NegotiationAssistant"
    }

    fn description(&self) -> &str {
        "Drafts seller communications and counter offers"
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["lead_id", "interaction_type"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let lead_id = task
            .string("lead_id")
            .ok_or_else(|| AgentError::InvalidInput("'lead_id' must be a string".to_string()))?;
        let label = task.string("interaction_type").unwrap_or_default();
        let interaction = Interaction::parse(&label)
            .ok_or_else(|| AgentError::InvalidInput(format!("Unknown interaction type: {label}")))?;

        info!(lead_id = %lead_id, interaction = %label, "Drafting seller message");
        let lead = LeadView::from_task(task);

        let message = match interaction {
            Interaction::InitialOffer => initial_offer(lead_id, &lead, offer_price(task)),
            Interaction::Followup => {
                let days = task
                    .parse_optional::<u32>("days_since_offer")?
                    .unwrap_or(DEFAULT_DAYS_SINCE_OFFER);
                followup(lead_id, &lead, days)
            }
            Interaction::Objection => {
                objection(lead_id, Objection::parse(task.string("objection_type").as_deref()))
            }
            Interaction::Negotiation => {
                let new_price = task.number("new_price").ok_or_else(|| {
                    AgentError::InvalidInput("negotiation requires a numeric 'new_price'".to_string())
                })?;
                counter_offer(lead_id, &lead, new_price, offer_price(task).unwrap_or(0.0))
            }
        };

        to_payload(&message)
    }
}

//! Support-domain value objects: the request to the engine and the ticket,
//! customer, and history records it references.

use crate::channel::Channel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An opaque reference to the ticket the customer wrote in on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRef {
    pub id: String,
    pub subject: String,
    pub status: String,
    pub priority: String,
}

/// An opaque reference to the customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
}

/// Who spoke a prior conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Customer,
    Assistant,
}

/// One prior turn of the ticket conversation, used as context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// The request to the engine. Immutable for the lifetime of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInput {
    /// The customer's free-text message
    pub message: String,

    /// The ticket this message belongs to
    pub ticket: TicketRef,

    /// The customer who wrote it
    pub customer: CustomerRef,

    /// Which surface the message arrived on
    pub channel: Channel,

    /// Prior conversation turns, oldest first
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
}

/// A customer profile as read from the ticket/customer store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A one-line summary of a recent ticket, for customer context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSummary {
    pub id: String,
    pub subject: String,
    pub status: String,
    pub opened_at: DateTime<Utc>,
}

/// One message from a ticket's transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketMessage {
    pub sender: Speaker,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

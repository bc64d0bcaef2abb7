//! Collaborator traits — the narrow contracts the engine depends on.
//!
//! Knowledge search, web search, and the ticket/customer store are built
//! elsewhere in the platform; the engine only sees these traits. All three
//! return an empty result set (not an error) when nothing matches or the
//! backend is unconfigured.

use crate::error::StoreError;
use crate::support::{CustomerProfile, TicketMessage, TicketSummary};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A ranked excerpt from the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbExcerpt {
    /// Stable article identifier, surfaced in the final result for grounding
    pub article_id: String,
    pub title: String,
    pub excerpt: String,
    /// Similarity score in [0, 1]
    pub similarity: f64,
    /// Optional source-file tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A ranked web search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Knowledge-search collaborator.
#[async_trait]
pub trait KnowledgeSearch: Send + Sync {
    /// Search for excerpts relevant to `query`, returning at most `limit`
    /// results ranked by similarity. Empty when nothing matches.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KbExcerpt>, StoreError>;
}

/// Web-search collaborator.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Search the web. Empty when unconfigured or no results.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<WebHit>, StoreError>;
}

/// Read access to the ticket/customer store.
///
/// This core never writes: on escalation approval, the surrounding system
/// transitions ticket status and notifies humans from the emitted payload.
#[async_trait]
pub trait SupportStore: Send + Sync {
    /// The customer's profile, or `None` if unknown.
    async fn customer_profile(
        &self,
        customer_id: &str,
    ) -> Result<Option<CustomerProfile>, StoreError>;

    /// Recent ticket summaries for a customer, newest first.
    async fn recent_tickets(
        &self,
        customer_id: &str,
        limit: usize,
    ) -> Result<Vec<TicketSummary>, StoreError>;

    /// The recent message transcript of a ticket, oldest first.
    async fn ticket_messages(
        &self,
        ticket_id: &str,
        limit: usize,
    ) -> Result<Vec<TicketMessage>, StoreError>;
}

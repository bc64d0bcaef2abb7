//! Canned collaborators shared by the tool tests.

use async_trait::async_trait;
use deskflow_core::channel::Channel;
use deskflow_core::collaborators::{KbExcerpt, KnowledgeSearch, SupportStore, WebHit, WebSearch};
use deskflow_core::error::StoreError;
use deskflow_core::support::{CustomerProfile, TicketMessage, TicketSummary};
use deskflow_core::tool::RunContext;

pub(crate) fn ctx() -> RunContext {
    ctx_with_counts(0, 0)
}

pub(crate) fn ctx_with_counts(prior_tool_calls: usize, web_searches: usize) -> RunContext {
    RunContext {
        ticket_id: "tkt_1".into(),
        customer_id: "cus_1".into(),
        channel: Channel::Widget,
        prior_tool_calls,
        web_searches,
    }
}

pub(crate) struct StubKb {
    excerpts: Vec<KbExcerpt>,
}

impl StubKb {
    pub(crate) fn with(excerpts: Vec<KbExcerpt>) -> Self {
        Self { excerpts }
    }

    pub(crate) fn empty() -> Self {
        Self::with(Vec::new())
    }
}

#[async_trait]
impl KnowledgeSearch for StubKb {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<KbExcerpt>, StoreError> {
        Ok(self.excerpts.iter().take(limit).cloned().collect())
    }
}

pub(crate) struct FailingKb;

#[async_trait]
impl KnowledgeSearch for FailingKb {
    async fn search(&self, _query: &str, _limit: usize) -> Result<Vec<KbExcerpt>, StoreError> {
        Err(StoreError::Unavailable("index offline".into()))
    }
}

pub(crate) struct StubWeb {
    hits: Vec<WebHit>,
}

impl StubWeb {
    pub(crate) fn with(hits: Vec<WebHit>) -> Self {
        Self { hits }
    }

    pub(crate) fn empty() -> Self {
        Self::with(Vec::new())
    }
}

#[async_trait]
impl WebSearch for StubWeb {
    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<WebHit>, StoreError> {
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

#[derive(Default)]
pub(crate) struct StubStore {
    profile: Option<CustomerProfile>,
    tickets: Vec<TicketSummary>,
    messages: Vec<TicketMessage>,
}

impl StubStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_profile(mut self, profile: CustomerProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub(crate) fn with_tickets(mut self, tickets: Vec<TicketSummary>) -> Self {
        self.tickets = tickets;
        self
    }

    pub(crate) fn with_messages(mut self, messages: Vec<TicketMessage>) -> Self {
        self.messages = messages;
        self
    }
}

#[async_trait]
impl SupportStore for StubStore {
    async fn customer_profile(
        &self,
        customer_id: &str,
    ) -> Result<Option<CustomerProfile>, StoreError> {
        Ok(self
            .profile
            .as_ref()
            .filter(|p| p.id == customer_id)
            .cloned())
    }

    async fn recent_tickets(
        &self,
        _customer_id: &str,
        limit: usize,
    ) -> Result<Vec<TicketSummary>, StoreError> {
        Ok(self.tickets.iter().take(limit).cloned().collect())
    }

    async fn ticket_messages(
        &self,
        _ticket_id: &str,
        limit: usize,
    ) -> Result<Vec<TicketMessage>, StoreError> {
        Ok(self.messages.iter().take(limit).cloned().collect())
    }
}

//! Support tools for the deskflow agent.
//!
//! Five tools let the model investigate before answering: knowledge-base
//! search, web search, customer context, ticket history, and escalation to
//! a human. The `Dispatcher` routes a requested tool name to its
//! implementation and never raises for expected failure modes — no results,
//! policy rejection, and collaborator outages all come back as informative
//! text the model can adapt to.

mod clip;

pub mod customer_context;
pub mod dispatcher;
pub mod escalate;
pub mod gate;
pub mod knowledge_search;
pub mod ticket_messages;
pub mod web_search;

#[cfg(test)]
pub(crate) mod stubs;

pub use dispatcher::Dispatcher;
pub use gate::{EscalationGate, GateDecision};
pub use web_search::WEB_SEARCH_LIMIT;

//! # Deskflow Core
//!
//! Domain types, traits, and error definitions for the deskflow support
//! agent engine. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (completion service, knowledge search, web
//! search, ticket/customer store) is defined as a trait here. Implementations
//! live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod channel;
pub mod collaborators;
pub mod completion;
pub mod error;
pub mod message;
pub mod support;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use channel::{Channel, ChannelClass};
pub use collaborators::{KbExcerpt, KnowledgeSearch, SupportStore, WebHit, WebSearch};
pub use completion::{
    CompletionClient, CompletionRequest, CompletionResponse, StopReason, StreamChunk,
    ToolDefinition, Usage,
};
pub use error::{CompletionError, Error, Result, StoreError, ToolError};
pub use message::{Conversation, Message, Role, RunId, ToolInvocation};
pub use support::{
    AgentInput, CustomerProfile, CustomerRef, HistoryTurn, Speaker, TicketMessage, TicketRef,
    TicketSummary,
};
pub use tool::{
    EscalationPayload, RunContext, Tool, ToolCallRecord, ToolData, ToolResult, ToolSet,
};

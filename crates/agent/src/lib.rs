//! The deskflow agent engine.
//!
//! Drives the multi-round tool-use loop that turns a customer message into
//! a terminal outcome: an answer, an approved escalation, a timeout notice,
//! or an error. Two surfaces share the same loop — `AgentEngine::run`
//! returns the buffered result, `AgentEngine::run_streamed` yields progress
//! events and reveals text incrementally.

pub mod confidence;
pub mod engine;
pub mod pacing;
pub mod prompts;
pub mod result;
pub mod session;
pub mod stream_event;

pub use engine::AgentEngine;
pub use result::{AgentResult, RunStats};
pub use stream_event::AgentStreamEvent;

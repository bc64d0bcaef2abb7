//! Events emitted on the streaming surface.
//!
//! One run emits zero or more progress events followed by exactly one
//! terminal event (`Complete` or `Error`). A dropped receiver means the
//! caller abandoned the run; the engine notices on the next emit and stops.

use serde::{Deserialize, Serialize};

use crate::result::AgentResult;

/// A progress or terminal event from a streaming run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentStreamEvent {
    /// The model is reasoning between rounds
    Thinking,

    /// A tool is about to run
    ToolCall { name: String, description: String },

    /// A tool finished
    ToolResult { name: String, success: bool },

    /// A piece of answer text
    TextDelta { content: String },

    /// Terminal: the run finished with a result
    Complete { result: AgentResult },

    /// Terminal: the run failed
    Error { message: String },
}

impl AgentStreamEvent {
    /// The `type` tag as serialized, for logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Thinking => "thinking",
            Self::ToolCall { .. } => "tool_call",
            Self::ToolResult { .. } => "tool_result",
            Self::TextDelta { .. } => "text_delta",
            Self::Complete { .. } => "complete",
            Self::Error { .. } => "error",
        }
    }
}

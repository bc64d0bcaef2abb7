//! Message and Conversation domain types.
//!
//! A `Conversation` is the append-only transcript one engine run exchanges
//! with the completion service: the channel-specific system instruction, the
//! seeded customer turn, then alternating assistant turns (which may carry
//! tool-invocation requests) and synthesized tool-result turns. It is owned
//! exclusively by one run and discarded when the run completes — never shared
//! across invocations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for one engine run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The customer (or a synthesized instruction turn)
    User,
    /// The model
    Assistant,
    /// System instructions (tone, channel rules)
    System,
    /// Tool execution result
    Tool,
}

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,

    /// Tool invocations requested by the assistant (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolInvocation>,

    /// If this is a tool result, which tool invocation it responds to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    /// Create a tool result message.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        let mut msg = Self::with_role(Role::Tool, content);
        msg.tool_call_id = Some(tool_call_id.into());
        msg
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            timestamp: Utc::now(),
        }
    }
}

/// A tool invocation requested in an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Unique ID for this invocation (matches the provider's tool_use id)
    pub id: String,

    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON string
    pub arguments: String,
}

/// The per-run, append-only message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    /// The run this transcript belongs to
    pub run_id: RunId,

    /// Ordered messages; grows monotonically, never rewritten
    pub messages: Vec<Message>,

    /// When this run started
    pub started_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self {
            run_id: RunId::new(),
            messages: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Append a message to the transcript.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("How do I enable recording?");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "How do I enable recording?");
        assert!(msg.tool_calls.is_empty());
    }

    #[test]
    fn tool_result_carries_call_id() {
        let msg = Message::tool_result("toolu_01", "3 articles found");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("toolu_01"));
    }

    #[test]
    fn conversation_appends_in_order() {
        let mut conv = Conversation::new();
        conv.push(Message::system("You are a support agent"));
        conv.push(Message::user("First message"));
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].role, Role::System);
        assert_eq!(conv.messages[1].role, Role::User);
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::user("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.content, "Test message");
        assert_eq!(deserialized.role, Role::User);
    }
}

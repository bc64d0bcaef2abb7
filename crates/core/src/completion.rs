//! CompletionClient trait — the abstraction over the text-generation service.
//!
//! A CompletionClient knows how to send a conversation to an LLM and get a
//! response back, either as a complete message or as a stream of text deltas.
//! The engine holds a primary client and, optionally, a secondary (fallback)
//! credential used once when the final streamed call is rate-limited.

use crate::error::CompletionError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,

    /// The conversation messages
    pub messages: Vec<Message>,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Available tools the model can call (empty on the final wrap-up call)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,

    /// Whether to stream the response
    #[serde(default)]
    pub stream: bool,
}

/// A tool definition sent to the LLM so it knows what tools it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural completion — the model is done
    EndTurn,
    /// The model wants tools executed before continuing
    ToolUse,
    /// The max-token ceiling was hit mid-answer
    MaxTokens,
}

/// A complete (non-streaming) response from the completion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated message (text and/or tool invocations)
    pub message: Message,

    /// Why generation stopped
    pub stop_reason: StopReason,

    /// Token usage statistics
    pub usage: Option<Usage>,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A single chunk in a streaming response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Partial answer text
    #[serde(default)]
    pub delta: Option<String>,

    /// Whether this is the final chunk
    #[serde(default)]
    pub done: bool,

    /// Usage info (typically only near the end of the stream)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// The completion service contract.
///
/// The orchestration loop calls `complete()` once per round and `stream()`
/// for the final incrementally-revealed answer — pure polymorphism over
/// whichever credential/backend is configured.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// A human-readable name for this client (e.g., "anthropic",
    /// "anthropic-fallback"). Used in logs to tell credentials apart.
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, CompletionError>;

    /// Send a request and get a stream of response chunks.
    ///
    /// Default implementation calls `complete()` and wraps the result as a
    /// single chunk.
    async fn stream(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamChunk, CompletionError>>,
        CompletionError,
    > {
        let response = self.complete(request).await?;
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        let _ = tx
            .send(Ok(StreamChunk {
                delta: Some(response.message.content),
                done: true,
                usage: response.usage,
            }))
            .await;
        Ok(rx)
    }
}

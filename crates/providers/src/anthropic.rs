//! Anthropic Messages API client.
//!
//! - `x-api-key` header authentication (not Bearer)
//! - `anthropic-version` header
//! - System instruction as top-level field
//! - Native tool use with `tool_use` / `tool_result` content blocks
//! - Streaming via SSE with `content_block_delta` events
//! - HTTP 429 surfaces as `CompletionError::RateLimited`, the class the
//!   engine's fallback retry triggers on

use async_trait::async_trait;
use deskflow_core::completion::*;
use deskflow_core::error::CompletionError;
use deskflow_core::message::{Message, Role, ToolInvocation};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic Messages API completion client.
pub struct AnthropicClient {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: "anthropic".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create with a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the client name so primary and fallback credentials are
    /// distinguishable in logs.
    pub fn with_client_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Extract system messages from the message list.
    /// Anthropic puts the system instruction as a top-level field.
    fn extract_system(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut non_system: Vec<&Message> = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => system_parts.push(&msg.content),
                _ => non_system.push(msg),
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system, non_system)
    }

    /// Convert messages to Anthropic API format with content blocks.
    fn to_api_messages(messages: &[&Message]) -> Vec<ApiMessage> {
        let mut result = Vec::new();

        for msg in messages {
            match msg.role {
                Role::User => {
                    result.push(ApiMessage {
                        role: "user".into(),
                        content: ApiContent::Text(msg.content.clone()),
                    });
                }
                Role::Assistant => {
                    if msg.tool_calls.is_empty() {
                        result.push(ApiMessage {
                            role: "assistant".into(),
                            content: ApiContent::Text(msg.content.clone()),
                        });
                    } else {
                        let mut blocks: Vec<ContentBlock> = Vec::new();
                        if !msg.content.is_empty() {
                            blocks.push(ContentBlock::Text {
                                text: msg.content.clone(),
                            });
                        }
                        for tc in &msg.tool_calls {
                            let input: serde_json::Value =
                                serde_json::from_str(&tc.arguments).unwrap_or_default();
                            blocks.push(ContentBlock::ToolUse {
                                id: tc.id.clone(),
                                name: tc.name.clone(),
                                input,
                            });
                        }
                        result.push(ApiMessage {
                            role: "assistant".into(),
                            content: ApiContent::Blocks(blocks),
                        });
                    }
                }
                Role::Tool => {
                    let tool_call_id = msg.tool_call_id.clone().unwrap_or_default();
                    result.push(ApiMessage {
                        role: "user".into(),
                        content: ApiContent::Blocks(vec![ContentBlock::ToolResult {
                            tool_use_id: tool_call_id,
                            content: msg.content.clone(),
                        }]),
                    });
                }
                Role::System => {} // handled separately
            }
        }

        result
    }

    /// Convert tool definitions to Anthropic format.
    fn to_api_tools(tools: &[ToolDefinition]) -> Vec<ApiTool> {
        tools
            .iter()
            .map(|t| ApiTool {
                name: t.name.clone(),
                description: t.description.clone(),
                input_schema: t.parameters.clone(),
            })
            .collect()
    }

    fn build_body(&self, request: &CompletionRequest, stream: bool) -> serde_json::Value {
        let (system, messages) = Self::extract_system(&request.messages);
        let api_messages = Self::to_api_messages(&messages);
        let max_tokens = request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": api_messages,
            "max_tokens": max_tokens,
        });

        if let Some(sys) = system {
            body["system"] = serde_json::json!(sys);
        }
        if !request.tools.is_empty() {
            body["tools"] = serde_json::json!(Self::to_api_tools(&request.tools));
        }
        if stream {
            body["stream"] = serde_json::json!(true);
        }

        body
    }

    /// Map an error status to the matching CompletionError class.
    fn status_error(status: u16, body: String) -> CompletionError {
        match status {
            429 => CompletionError::RateLimited {
                retry_after_secs: 5,
            },
            401 | 403 => CompletionError::AuthenticationFailed("Invalid Anthropic API key".into()),
            _ => CompletionError::ApiError {
                status_code: status,
                message: body,
            },
        }
    }

    /// Convert an Anthropic API response body to our CompletionResponse.
    fn to_completion_response(resp: ApiResponse) -> CompletionResponse {
        let mut text_content = String::new();
        let mut tool_calls = Vec::new();

        for block in &resp.content {
            match block {
                ResponseContentBlock::Text { text } => {
                    if !text_content.is_empty() {
                        text_content.push('\n');
                    }
                    text_content.push_str(text);
                }
                ResponseContentBlock::ToolUse { id, name, input } => {
                    tool_calls.push(ToolInvocation {
                        id: id.clone(),
                        name: name.clone(),
                        arguments: serde_json::to_string(input).unwrap_or_default(),
                    });
                }
            }
        }

        let stop_reason = match resp.stop_reason.as_deref() {
            Some("tool_use") => StopReason::ToolUse,
            Some("max_tokens") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        };

        let mut message = Message::assistant(text_content);
        message.id = resp.id;
        message.tool_calls = tool_calls;

        CompletionResponse {
            message,
            stop_reason,
            usage: Some(Usage {
                input_tokens: resp.usage.input_tokens,
                output_tokens: resp.usage.output_tokens,
            }),
            model: resp.model,
        }
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, CompletionError> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_body(&request, false);

        debug!(client = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(client = %self.name, status, body = %error_body, "Anthropic API error");
            return Err(Self::status_error(status, error_body));
        }

        let api_resp: ApiResponse = response.json().await.map_err(|e| {
            CompletionError::ApiError {
                status_code: 200,
                message: format!("Failed to parse Anthropic response: {e}"),
            }
        })?;

        Ok(Self::to_completion_response(api_resp))
    }

    async fn stream(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<
        tokio::sync::mpsc::Receiver<std::result::Result<StreamChunk, CompletionError>>,
        CompletionError,
    > {
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_body(&request, true);

        debug!(client = %self.name, model = %request.model, "Sending streaming request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::status_error(status, error_body));
        }

        let (tx, rx) = tokio::sync::mpsc::channel(64);

        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut buffer = String::new();
            let mut input_tokens: u32 = 0;
            let mut output_tokens: u32 = 0;

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(b) => b,
                    Err(e) => {
                        let _ = tx
                            .send(Err(CompletionError::StreamInterrupted(e.to_string())))
                            .await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim_end_matches('\r').to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    if line.is_empty() || line.starts_with(':') {
                        continue;
                    }

                    if let Some(event_type) = line.strip_prefix("event: ") {
                        if event_type.trim() == "message_stop" {
                            let _ = tx
                                .send(Ok(StreamChunk {
                                    delta: None,
                                    done: true,
                                    usage: Some(Usage {
                                        input_tokens,
                                        output_tokens,
                                    }),
                                }))
                                .await;
                            return;
                        }
                        continue;
                    }

                    if let Some(data) = line.strip_prefix("data: ") {
                        let data = data.trim();
                        if data.is_empty() {
                            continue;
                        }

                        let event: serde_json::Value = match serde_json::from_str(data) {
                            Ok(v) => v,
                            Err(e) => {
                                trace!(error = %e, data = %data, "Ignoring unparseable Anthropic SSE");
                                continue;
                            }
                        };

                        match event["type"].as_str().unwrap_or("") {
                            "message_start" => {
                                if let Some(inp) =
                                    event["message"]["usage"]["input_tokens"].as_u64()
                                {
                                    input_tokens = inp as u32;
                                }
                            }
                            "content_block_delta" => {
                                let delta = &event["delta"];
                                if delta["type"].as_str() == Some("text_delta") {
                                    if let Some(text) = delta["text"].as_str() {
                                        let chunk = StreamChunk {
                                            delta: Some(text.to_string()),
                                            done: false,
                                            usage: None,
                                        };
                                        if tx.send(Ok(chunk)).await.is_err() {
                                            return;
                                        }
                                    }
                                }
                            }
                            "message_delta" => {
                                if let Some(out) = event["usage"]["output_tokens"].as_u64() {
                                    output_tokens = out as u32;
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }

            // Stream ended without message_stop — send final chunk
            let _ = tx
                .send(Ok(StreamChunk {
                    delta: None,
                    done: true,
                    usage: Some(Usage {
                        input_tokens,
                        output_tokens,
                    }),
                }))
                .await;
        });

        Ok(rx)
    }
}

// --- Anthropic API types ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: ApiContent,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ApiContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(rename = "tool_result")]
    ToolResult { tool_use_id: String, content: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiTool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    id: String,
    model: String,
    content: Vec<ResponseContentBlock>,
    usage: ApiUsage,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    input_tokens: u32,
    output_tokens: u32,
}

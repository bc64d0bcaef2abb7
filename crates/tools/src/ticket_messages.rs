//! Ticket transcript tool — the recent message history of a ticket.

use async_trait::async_trait;
use deskflow_core::collaborators::SupportStore;
use deskflow_core::error::ToolError;
use deskflow_core::support::Speaker;
use deskflow_core::tool::{RunContext, Tool, ToolResult};
use std::sync::Arc;
use tracing::warn;

/// Messages returned per lookup.
const MESSAGE_LIMIT: usize = 10;
/// Each message body is truncated to keep tool output bounded.
const BODY_MAX_BYTES: usize = 300;

pub struct TicketMessagesTool {
    store: Arc<dyn SupportStore>,
}

impl TicketMessagesTool {
    pub fn new(store: Arc<dyn SupportStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for TicketMessagesTool {
    fn name(&self) -> &str {
        "get_ticket_messages"
    }

    fn description(&self) -> &str {
        "Fetch the recent message transcript of a ticket, to see what has already been \
         said and tried."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "ticket_id": {
                    "type": "string",
                    "description": "The ticket to read (defaults to the current ticket)"
                }
            }
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        ctx: &RunContext,
    ) -> Result<ToolResult, ToolError> {
        let ticket_id = arguments["ticket_id"]
            .as_str()
            .unwrap_or(&ctx.ticket_id)
            .to_string();

        let messages = match self.store.ticket_messages(&ticket_id, MESSAGE_LIMIT).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, ticket_id = %ticket_id, "Ticket transcript lookup failed");
                return Ok(ToolResult::failure(
                    "The ticket store is temporarily unavailable. Continue with the current \
                     message only.",
                    "ticket store unavailable",
                ));
            }
        };

        if messages.is_empty() {
            return Ok(ToolResult::text(
                format!("Ticket '{ticket_id}' has no messages yet."),
                format!("no messages on '{ticket_id}'"),
            ));
        }

        let mut output = format!("Transcript of ticket '{ticket_id}':\n");
        for msg in &messages {
            let who = match msg.sender {
                Speaker::Customer => "Customer",
                Speaker::Assistant => "Agent",
            };
            let mut body = msg.body.clone();
            crate::clip::clip(&mut body, BODY_MAX_BYTES);
            output.push_str(&format!(
                "\n[{}] {}: {}\n",
                msg.sent_at.format("%Y-%m-%d %H:%M"),
                who,
                body,
            ));
        }

        let summary = format!("{} message(s) on '{ticket_id}'", messages.len());
        Ok(ToolResult::text(output, summary))
    }
}

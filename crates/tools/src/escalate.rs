//! Escalation tool, guarded by the channel-aware gate.
//!
//! Approval produces a structured handoff payload; rejection produces
//! coaching text pointing the model at the investigation tools it has not
//! used enough yet. A rejected attempt has no side effect.

use async_trait::async_trait;
use deskflow_core::error::ToolError;
use deskflow_core::tool::{EscalationPayload, RunContext, Tool, ToolData, ToolResult};
use tracing::info;

use crate::gate::{EscalationGate, GateDecision};

pub struct EscalateTool {
    gate: EscalationGate,
}

impl EscalateTool {
    pub fn new(gate: EscalationGate) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl Tool for EscalateTool {
    fn name(&self) -> &str {
        "escalate_to_human"
    }

    fn description(&self) -> &str {
        "Hand the conversation off to a human support agent. Only use this after \
         exhausting the knowledge base and ticket context, or when the customer \
         explicitly needs something only a human can do."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "reason": {
                    "type": "string",
                    "description": "Short machine-readable reason for the handoff"
                },
                "summary": {
                    "type": "string",
                    "description": "What was tried and what the human should pick up"
                }
            },
            "required": ["reason", "summary"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        ctx: &RunContext,
    ) -> Result<ToolResult, ToolError> {
        let reason = arguments["reason"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'reason' argument".into()))?
            .to_string();
        let summary = arguments["summary"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'summary' argument".into()))?
            .to_string();

        match self.gate.evaluate(ctx.channel, ctx.prior_tool_calls) {
            GateDecision::Approved => {
                info!(
                    channel = %ctx.channel,
                    prior_tool_calls = ctx.prior_tool_calls,
                    reason = %reason,
                    "Escalation approved"
                );
                let payload = EscalationPayload { reason, summary };
                let output = serde_json::to_string(&payload)
                    .map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
                Ok(ToolResult::text(output, "escalation approved")
                    .with_data(ToolData::Escalation(payload)))
            }
            GateDecision::Rejected { required } => {
                info!(
                    channel = %ctx.channel,
                    prior_tool_calls = ctx.prior_tool_calls,
                    required,
                    "Escalation rejected"
                );
                Ok(ToolResult::text(
                    format!(
                        "Escalation not accepted yet: only {} of the {} required tool calls \
                         have been made on this {} conversation. Before handing off, \
                         investigate with search_knowledge_base, get_ticket_messages, and \
                         get_customer_context, then answer or escalate with what you found.",
                        ctx.prior_tool_calls, required, ctx.channel,
                    ),
                    "escalation rejected",
                ))
            }
        }
    }
}

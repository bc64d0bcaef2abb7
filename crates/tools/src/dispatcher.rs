//! Tool dispatcher — the single entry point the orchestration loop uses to
//! run tools.
//!
//! Dispatch never fails: unknown tools and malformed arguments come back as
//! failed `ToolResult`s so the model can recover in the next round, and every
//! dispatch yields a `ToolCallRecord` for the run's accounting.

use deskflow_core::collaborators::{KnowledgeSearch, SupportStore, WebSearch};
use deskflow_core::completion::ToolDefinition;
use deskflow_core::error::ToolError;
use deskflow_core::tool::{RunContext, ToolCallRecord, ToolResult, ToolSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::customer_context::CustomerContextTool;
use crate::escalate::EscalateTool;
use crate::gate::EscalationGate;
use crate::knowledge_search::KnowledgeSearchTool;
use crate::ticket_messages::TicketMessagesTool;
use crate::web_search::WebSearchTool;

pub struct Dispatcher {
    tools: ToolSet,
}

impl Dispatcher {
    /// Build the full support tool set over the given collaborators.
    pub fn new(
        kb: Arc<dyn KnowledgeSearch>,
        web: Arc<dyn WebSearch>,
        store: Arc<dyn SupportStore>,
        gate: EscalationGate,
    ) -> Self {
        let mut tools = ToolSet::new();
        tools.register(Box::new(KnowledgeSearchTool::new(kb)));
        tools.register(Box::new(WebSearchTool::new(web)));
        tools.register(Box::new(TicketMessagesTool::new(store.clone())));
        tools.register(Box::new(CustomerContextTool::new(store)));
        tools.register(Box::new(EscalateTool::new(gate)));
        Self { tools }
    }

    /// Definitions advertised to the completion API.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    pub fn description_of(&self, name: &str) -> Option<String> {
        self.tools.get(name).map(|t| t.description().to_string())
    }

    /// Execute one tool call and time it. Errors are folded into the result
    /// text so the loop always has something to hand back to the model.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: serde_json::Value,
        ctx: &RunContext,
    ) -> (ToolResult, ToolCallRecord) {
        let started = Instant::now();
        debug!(tool = name, "Dispatching tool call");

        let result = match self.tools.get(name) {
            Some(tool) => match tool.execute(arguments.clone(), ctx).await {
                Ok(result) => result,
                Err(ToolError::InvalidArguments(msg)) => {
                    warn!(tool = name, error = %msg, "Invalid tool arguments");
                    ToolResult::failure(
                        format!("Invalid arguments for '{name}': {msg}"),
                        "invalid arguments",
                    )
                }
                Err(ToolError::NotFound(msg)) => {
                    warn!(tool = name, error = %msg, "Tool reported missing dependency");
                    ToolResult::failure(format!("Tool '{name}' failed: {msg}"), "tool failed")
                }
            },
            None => {
                warn!(tool = name, "Unknown tool requested");
                ToolResult::failure(
                    format!(
                        "Unknown tool '{}'. Available tools: {}",
                        name,
                        self.tools.names().join(", ")
                    ),
                    "unknown tool",
                )
            }
        };

        let record = ToolCallRecord {
            tool: name.to_string(),
            input: arguments,
            summary: result.summary.clone(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        debug!(tool = name, success = result.success, summary = %record.summary, "Tool call finished");
        (result, record)
    }
}

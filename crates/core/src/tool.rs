//! Tool trait — the abstraction over the engine's support tools.
//!
//! Tools are what let the agent investigate before answering: search the
//! knowledge base, search the web, pull customer context and ticket history,
//! or request escalation to a human. Expected failure modes (no results,
//! policy rejection, collaborator outage) are encoded as informative text
//! so the model can adapt — a tool only errors on malformed arguments.

use crate::channel::Channel;
use crate::completion::ToolDefinition;
use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-run facts a tool may need: which ticket/customer this run is about
/// and how much work has already been done (for the web-search cap and the
/// escalation gate).
#[derive(Debug, Clone)]
pub struct RunContext {
    pub ticket_id: String,
    pub customer_id: String,
    pub channel: Channel,
    /// Investigative tool calls already executed in this run, before the
    /// current one. Escalation attempts are excluded: the gate measures
    /// demonstrated effort, which repeat escalation requests are not.
    pub prior_tool_calls: usize,
    /// Web searches already executed in this run
    pub web_searches: usize,
}

/// The structured escalation request the engine emits on gate approval.
/// The surrounding system performs the actual hand-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationPayload {
    /// Internal-only reason, never shown to the customer
    pub reason: String,
    /// Internal-only summary of what was tried
    pub summary: String,
}

/// Structured side information a tool result can carry back to the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolData {
    /// Nothing beyond the text
    None,
    /// Knowledge-base article ids surfaced by this call
    KnowledgeArticles(Vec<String>),
    /// A web search actually executed (counts against the per-run cap)
    WebSearched,
    /// The escalation gate approved this hand-off
    Escalation(EscalationPayload),
}

/// The result of a tool execution. Always usable text — the conversation
/// can continue regardless of what happened inside the tool.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Text fed back to the model as the tool-result turn
    pub output: String,

    /// Short human-readable summary for the audit log
    pub summary: String,

    /// Whether the tool did what was asked (false for unknown tool,
    /// malformed arguments, or an unavailable collaborator)
    pub success: bool,

    /// Structured side information for the loop
    pub data: ToolData,
}

impl ToolResult {
    /// A successful plain-text result.
    pub fn text(output: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            summary: summary.into(),
            success: true,
            data: ToolData::None,
        }
    }

    /// A recovered-failure result: informative text, flagged unsuccessful.
    pub fn failure(output: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            summary: summary.into(),
            success: false,
            data: ToolData::None,
        }
    }

    /// Attach structured data.
    pub fn with_data(mut self, data: ToolData) -> Self {
        self.data = data;
        self
    }
}

/// One audit record per executed tool call. Never mutated after append;
/// persisted as part of the final result for audit and cost analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Tool name
    pub tool: String,

    /// Input parameters as requested by the model
    pub input: serde_json::Value,

    /// Short human-readable summary of the output
    pub summary: String,

    /// Execution duration in milliseconds
    pub duration_ms: u64,
}

/// The core Tool trait.
///
/// Each support tool implements this trait and is registered in a `ToolSet`
/// so the dispatcher can look it up by the name the model requested.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "search_knowledge_base").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments and run context.
    async fn execute(
        &self,
        arguments: serde_json::Value,
        ctx: &RunContext,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a ToolDefinition for sending to the LLM.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools, keyed by name.
pub struct ToolSet {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Get all tool definitions (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.to_definition()).collect()
    }

    /// List all registered tool names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ToolSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes back the input"
        }
        fn parameters_schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }
        async fn execute(
            &self,
            arguments: serde_json::Value,
            _ctx: &RunContext,
        ) -> std::result::Result<ToolResult, ToolError> {
            let text = arguments["text"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidArguments("missing 'text'".into()))?;
            Ok(ToolResult::text(text, "echoed"))
        }
    }

    fn ctx() -> RunContext {
        RunContext {
            ticket_id: "tkt_1".into(),
            customer_id: "cus_1".into(),
            channel: Channel::Widget,
            prior_tool_calls: 0,
            web_searches: 0,
        }
    }

    #[test]
    fn toolset_register_and_lookup() {
        let mut set = ToolSet::new();
        set.register(Box::new(EchoTool));
        assert!(set.get("echo").is_some());
        assert!(set.get("nonexistent").is_none());
    }

    #[test]
    fn toolset_definitions() {
        let mut set = ToolSet::new();
        set.register(Box::new(EchoTool));
        let defs = set.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
    }

    #[tokio::test]
    async fn tool_executes_with_context() {
        let mut set = ToolSet::new();
        set.register(Box::new(EchoTool));

        let result = set
            .get("echo")
            .unwrap()
            .execute(serde_json::json!({"text": "hello"}), &ctx())
            .await
            .unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hello");
        assert_eq!(result.data, ToolData::None);
    }

    #[tokio::test]
    async fn invalid_arguments_error() {
        let mut set = ToolSet::new();
        set.register(Box::new(EchoTool));

        let err = set
            .get("echo")
            .unwrap()
            .execute(serde_json::json!({}), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn failure_result_is_flagged() {
        let result = ToolResult::failure("nothing found", "no results");
        assert!(!result.success);
        assert_eq!(result.data, ToolData::None);
    }
}

//! The engine's terminal result types.

use deskflow_core::tool::ToolCallRecord;
use serde::{Deserialize, Serialize};

/// Accounting for one run, attached to every terminal outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Self-assessed confidence in [0, 1]
    pub confidence: f32,

    /// Knowledge-base article ids the answer is grounded on, in first-seen
    /// order, deduplicated
    pub kb_article_ids: Vec<String>,

    /// Web searches executed (at most 3)
    pub web_search_count: usize,

    /// Tool executions, equal to `tool_calls.len()`
    pub total_tool_calls: usize,

    /// One audit record per executed tool call, in execution order
    pub tool_calls: Vec<ToolCallRecord>,

    /// Wall-clock duration of the run
    pub duration_ms: u64,

    /// Tokens sent across all completion calls
    pub input_tokens: u64,

    /// Tokens generated across all completion calls
    pub output_tokens: u64,
}

/// The terminal outcome of one engine run.
///
/// Serialized with a `kind` tag so downstream consumers (ticket pipeline,
/// analytics) can dispatch without knowing the Rust type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentResult {
    /// A direct answer for the customer
    Response { text: String, stats: RunStats },

    /// The gate approved a hand-off; `text` is the customer-facing notice,
    /// `reason` and `summary` are internal-only
    Escalation {
        text: String,
        reason: String,
        summary: String,
        stats: RunStats,
    },

    /// The wall-clock budget ran out at a round boundary
    Timeout { text: String, stats: RunStats },

    /// An unrecoverable failure; `text` is a customer-safe apology,
    /// `message` is the internal error detail
    Error {
        text: String,
        message: String,
        stats: RunStats,
    },
}

impl AgentResult {
    /// The customer-facing text of this outcome.
    pub fn text(&self) -> &str {
        match self {
            Self::Response { text, .. }
            | Self::Escalation { text, .. }
            | Self::Timeout { text, .. }
            | Self::Error { text, .. } => text,
        }
    }

    /// The run accounting.
    pub fn stats(&self) -> &RunStats {
        match self {
            Self::Response { stats, .. }
            | Self::Escalation { stats, .. }
            | Self::Timeout { stats, .. }
            | Self::Error { stats, .. } => stats,
        }
    }

    /// The `kind` tag as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Response { .. } => "response",
            Self::Escalation { .. } => "escalation",
            Self::Timeout { .. } => "timeout",
            Self::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> RunStats {
        RunStats {
            confidence: 0.75,
            kb_article_ids: vec!["kb_1".into()],
            web_search_count: 1,
            total_tool_calls: 2,
            tool_calls: vec![
                ToolCallRecord {
                    tool: "search_knowledge_base".into(),
                    input: serde_json::json!({"query": "recording"}),
                    summary: "1 article(s)".into(),
                    duration_ms: 12,
                },
                ToolCallRecord {
                    tool: "search_web".into(),
                    input: serde_json::json!({"query": "sip"}),
                    summary: "2 web result(s)".into(),
                    duration_ms: 80,
                },
            ],
            duration_ms: 1500,
            input_tokens: 900,
            output_tokens: 200,
        }
    }

    #[test]
    fn serializes_with_kind_tag() {
        let result = AgentResult::Response {
            text: "Enable it in Settings.".into(),
            stats: stats(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "response");
        assert_eq!(json["stats"]["total_tool_calls"], 2);
    }

    #[test]
    fn escalation_carries_internal_fields() {
        let result = AgentResult::Escalation {
            text: "Connecting you with a specialist.".into(),
            reason: "billing_dispute".into(),
            summary: "KB had no matching policy".into(),
            stats: stats(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "escalation");
        assert_eq!(json["reason"], "billing_dispute");
        assert_eq!(result.kind(), "escalation");
    }

    #[test]
    fn stats_accessor_is_uniform() {
        let result = AgentResult::Timeout {
            text: "Still working on it.".into(),
            stats: stats(),
        };
        assert_eq!(result.stats().tool_calls.len(), 2);
        assert_eq!(result.text(), "Still working on it.");
    }
}

//! Per-run accounting: the append-only ledger behind `RunStats`.

use deskflow_core::completion::Usage;
use deskflow_core::tool::{ToolCallRecord, ToolData};
use std::time::{Duration, Instant};

use crate::result::RunStats;

/// Accumulates everything one run did. Created at run start, finished once
/// into the `RunStats` attached to the terminal result.
pub struct SessionLedger {
    started: Instant,
    input_tokens: u64,
    output_tokens: u64,
    records: Vec<ToolCallRecord>,
    kb_article_ids: Vec<String>,
    web_searches: usize,
}

impl SessionLedger {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            input_tokens: 0,
            output_tokens: 0,
            records: Vec::new(),
            kb_article_ids: Vec::new(),
            web_searches: 0,
        }
    }

    /// Add the token usage of one completion call.
    pub fn record_usage(&mut self, usage: Option<Usage>) {
        if let Some(usage) = usage {
            self.input_tokens += u64::from(usage.input_tokens);
            self.output_tokens += u64::from(usage.output_tokens);
        }
    }

    /// Record one executed tool call and fold in its structured data.
    /// Article ids are kept in first-seen order, deduplicated.
    pub fn record_tool(&mut self, record: ToolCallRecord, data: &ToolData) {
        match data {
            ToolData::KnowledgeArticles(ids) => {
                for id in ids {
                    if !self.kb_article_ids.contains(id) {
                        self.kb_article_ids.push(id.clone());
                    }
                }
            }
            ToolData::WebSearched => self.web_searches += 1,
            ToolData::None | ToolData::Escalation(_) => {}
        }
        self.records.push(record);
    }

    /// Tool calls executed so far.
    pub fn executed_tool_calls(&self) -> usize {
        self.records.len()
    }

    /// Executed calls excluding escalation attempts — the demonstrated
    /// investigation effort the escalation gate counts. Repeated escalation
    /// requests alone never accumulate effort.
    pub fn investigative_tool_calls(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.tool != "escalate_to_human")
            .count()
    }

    /// Web searches executed so far.
    pub fn web_searches(&self) -> usize {
        self.web_searches
    }

    /// Whether any knowledge-base article grounded this run.
    pub fn kb_grounded(&self) -> bool {
        !self.kb_article_ids.is_empty()
    }

    /// Knowledge-base plus web searches, for the effort bonus.
    pub fn search_calls(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.tool == "search_knowledge_base" || r.tool == "search_web")
            .count()
    }

    /// Wall-clock time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Close the ledger into the stats attached to the terminal result.
    pub fn finish(self, confidence: f32) -> RunStats {
        RunStats {
            confidence,
            kb_article_ids: self.kb_article_ids,
            web_search_count: self.web_searches,
            total_tool_calls: self.records.len(),
            tool_calls: self.records,
            duration_ms: self.started.elapsed().as_millis() as u64,
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
        }
    }
}

impl Default for SessionLedger {
    fn default() -> Self {
        Self::new()
    }
}

//! Web search tool, capped at three executions per run.
//!
//! The cap is checked against `RunContext::web_searches`; the 4th and later
//! requests in the same run receive a "synthesize what you have" message
//! instead of executing, and do not count as searches.

use async_trait::async_trait;
use deskflow_core::collaborators::WebSearch;
use deskflow_core::error::ToolError;
use deskflow_core::tool::{RunContext, Tool, ToolData, ToolResult};
use std::sync::Arc;
use tracing::warn;

/// Maximum web searches per run.
pub const WEB_SEARCH_LIMIT: usize = 3;

/// Results returned per query.
const MAX_RESULTS: usize = 3;

pub struct WebSearchTool {
    web: Arc<dyn WebSearch>,
}

impl WebSearchTool {
    pub fn new(web: Arc<dyn WebSearch>) -> Self {
        Self { web }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "search_web"
    }

    fn description(&self) -> &str {
        "Search the web for information not covered by the knowledge base. \
         Limited to 3 searches per conversation — use them sparingly."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        ctx: &RunContext,
    ) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        if ctx.web_searches >= WEB_SEARCH_LIMIT {
            return Ok(ToolResult::text(
                format!(
                    "Maximum of {WEB_SEARCH_LIMIT} web searches reached for this conversation. \
                     Synthesize an answer from the information you already have."
                ),
                "web search limit reached",
            ));
        }

        let hits = match self.web.search(query, MAX_RESULTS).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(error = %e, "Web search failed");
                return Ok(ToolResult::failure(
                    "Web search is temporarily unavailable. Use the knowledge base or ticket \
                     context instead.",
                    "web search unavailable",
                ));
            }
        };

        if hits.is_empty() {
            // An attempted search counts against the cap even when empty
            return Ok(ToolResult::text(
                format!("No web results for '{query}'. Try different keywords."),
                format!("no web results for '{query}'"),
            )
            .with_data(ToolData::WebSearched));
        }

        let mut output = format!("Web results for '{query}':\n");
        for (i, hit) in hits.iter().enumerate() {
            output.push_str(&format!(
                "\n{}. {} — {}\n{}\n",
                i + 1,
                hit.title,
                hit.url,
                hit.snippet,
            ));
        }

        let summary = format!("{} web result(s) for '{query}'", hits.len());
        Ok(ToolResult::text(output, summary).with_data(ToolData::WebSearched))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stubs::{ctx, ctx_with_counts, StubWeb};
    use deskflow_core::collaborators::WebHit;

    fn hit(title: &str) -> WebHit {
        WebHit {
            title: title.into(),
            url: "https://example.com/a".into(),
            snippet: "A relevant snippet.".into(),
        }
    }

    #[tokio::test]
    async fn returns_formatted_hits() {
        let tool = WebSearchTool::new(Arc::new(StubWeb::with(vec![
            hit("SIP trunk setup"),
            hit("Provider comparison"),
        ])));
        let result = tool
            .execute(serde_json::json!({"query": "sip trunk"}), &ctx())
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("SIP trunk setup"));
        assert_eq!(result.data, ToolData::WebSearched);
    }

    #[tokio::test]
    async fn cap_blocks_fourth_search() {
        let tool = WebSearchTool::new(Arc::new(StubWeb::with(vec![hit("Should not appear")])));
        let result = tool
            .execute(
                serde_json::json!({"query": "anything"}),
                &ctx_with_counts(5, WEB_SEARCH_LIMIT),
            )
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("Synthesize"));
        assert!(!result.output.contains("Should not appear"));
        // Does not count as a search
        assert_eq!(result.data, ToolData::None);
    }

    #[tokio::test]
    async fn empty_results_still_count() {
        let tool = WebSearchTool::new(Arc::new(StubWeb::empty()));
        let result = tool
            .execute(serde_json::json!({"query": "obscure"}), &ctx())
            .await
            .unwrap();

        assert!(result.output.contains("No web results"));
        assert_eq!(result.data, ToolData::WebSearched);
    }

    #[tokio::test]
    async fn missing_query_is_invalid_arguments() {
        let tool = WebSearchTool::new(Arc::new(StubWeb::empty()));
        let err = tool.execute(serde_json::json!({}), &ctx()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}

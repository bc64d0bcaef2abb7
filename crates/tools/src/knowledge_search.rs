//! Knowledge-base search tool.
//!
//! Delegates to the `KnowledgeSearch` collaborator and formats a bounded
//! number of ranked excerpts for the model. Surfaced article ids ride along
//! as `ToolData::KnowledgeArticles` so the loop can report grounding.

use async_trait::async_trait;
use deskflow_core::collaborators::KnowledgeSearch;
use deskflow_core::error::ToolError;
use deskflow_core::tool::{RunContext, Tool, ToolData, ToolResult};
use std::sync::Arc;
use tracing::warn;

/// Excerpts returned per query.
const MAX_RESULTS: usize = 3;
/// Excerpt text is truncated to keep tool output bounded.
const EXCERPT_MAX_BYTES: usize = 600;

pub struct KnowledgeSearchTool {
    kb: Arc<dyn KnowledgeSearch>,
}

impl KnowledgeSearchTool {
    pub fn new(kb: Arc<dyn KnowledgeSearch>) -> Self {
        Self { kb }
    }
}

#[async_trait]
impl Tool for KnowledgeSearchTool {
    fn name(&self) -> &str {
        "search_knowledge_base"
    }

    fn description(&self) -> &str {
        "Search the help-center knowledge base for articles relevant to the customer's question. \
         Returns ranked article excerpts with identifiers. Always try this before searching the web."
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
        _ctx: &RunContext,
    ) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let excerpts = match self.kb.search(query, MAX_RESULTS).await {
            Ok(excerpts) => excerpts,
            Err(e) => {
                warn!(error = %e, "Knowledge search failed");
                return Ok(ToolResult::failure(
                    "The knowledge base is temporarily unavailable. Answer from ticket context \
                     or try search_web instead.",
                    "knowledge base unavailable",
                ));
            }
        };

        if excerpts.is_empty() {
            return Ok(ToolResult::text(
                format!(
                    "No knowledge base articles matched '{query}'. Try rephrasing the query \
                     with different keywords, or search the web."
                ),
                format!("no articles for '{query}'"),
            ));
        }

        let mut output = format!("Found {} relevant article(s):\n", excerpts.len());
        let mut article_ids = Vec::with_capacity(excerpts.len());
        for (i, ex) in excerpts.iter().enumerate() {
            let mut text = ex.excerpt.clone();
            crate::clip::clip(&mut text, EXCERPT_MAX_BYTES);
            output.push_str(&format!(
                "\n{}. [{}] {} (similarity {:.2}{})\n{}\n",
                i + 1,
                ex.article_id,
                ex.title,
                ex.similarity,
                ex.source
                    .as_deref()
                    .map(|s| format!(", source: {s}"))
                    .unwrap_or_default(),
                text,
            ));
            article_ids.push(ex.article_id.clone());
        }

        let summary = format!("{} article(s) for '{query}'", article_ids.len());
        Ok(ToolResult::text(output, summary)
            .with_data(ToolData::KnowledgeArticles(article_ids)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stubs::{ctx, FailingKb, StubKb};
    use deskflow_core::collaborators::KbExcerpt;

    fn excerpt(id: &str, title: &str) -> KbExcerpt {
        KbExcerpt {
            article_id: id.into(),
            title: title.into(),
            excerpt: "Go to Settings → Calls → Recording and toggle it on.".into(),
            similarity: 0.91,
            source: Some("calls/recording.md".into()),
        }
    }

    #[tokio::test]
    async fn formats_excerpts_and_surfaces_ids() {
        let tool = KnowledgeSearchTool::new(Arc::new(StubKb::with(vec![
            excerpt("kb_101", "Enabling call recording"),
            excerpt("kb_102", "Recording retention"),
        ])));

        let result = tool
            .execute(serde_json::json!({"query": "enable recording"}), &ctx())
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("kb_101"));
        assert!(result.output.contains("Enabling call recording"));
        assert_eq!(
            result.data,
            ToolData::KnowledgeArticles(vec!["kb_101".into(), "kb_102".into()])
        );
    }

    #[tokio::test]
    async fn empty_results_coach_rephrasing() {
        let tool = KnowledgeSearchTool::new(Arc::new(StubKb::empty()));
        let result = tool
            .execute(serde_json::json!({"query": "quantum billing"}), &ctx())
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("rephrasing"));
        assert_eq!(result.data, ToolData::None);
    }

    #[tokio::test]
    async fn collaborator_outage_becomes_text() {
        let tool = KnowledgeSearchTool::new(Arc::new(FailingKb));
        let result = tool
            .execute(serde_json::json!({"query": "anything"}), &ctx())
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.contains("unavailable"));
    }

    #[tokio::test]
    async fn missing_query_is_invalid_arguments() {
        let tool = KnowledgeSearchTool::new(Arc::new(StubKb::empty()));
        let err = tool.execute(serde_json::json!({}), &ctx()).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn long_excerpts_are_truncated() {
        let mut ex = excerpt("kb_1", "Long");
        ex.excerpt = "x".repeat(2000);
        let tool = KnowledgeSearchTool::new(Arc::new(StubKb::with(vec![ex])));
        let result = tool
            .execute(serde_json::json!({"query": "long"}), &ctx())
            .await
            .unwrap();
        assert!(result.output.len() < 1200);
        assert!(result.output.contains('…'));
    }

    #[tokio::test]
    async fn multibyte_excerpts_truncate_on_char_boundaries() {
        // The offset shift puts the byte limit mid-char
        let mut ex = excerpt("kb_1", "Arrows");
        ex.excerpt = format!("a{}", "→".repeat(250));
        let tool = KnowledgeSearchTool::new(Arc::new(StubKb::with(vec![ex])));
        let result = tool
            .execute(serde_json::json!({"query": "arrows"}), &ctx())
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains('…'));
    }
}

//! Customer context tool — profile fields plus recent ticket history.

use async_trait::async_trait;
use deskflow_core::collaborators::SupportStore;
use deskflow_core::error::ToolError;
use deskflow_core::tool::{RunContext, Tool, ToolResult};
use std::sync::Arc;
use tracing::warn;

/// Recent tickets summarized per lookup.
const RECENT_TICKET_LIMIT: usize = 5;

pub struct CustomerContextTool {
    store: Arc<dyn SupportStore>,
}

impl CustomerContextTool {
    pub fn new(store: Arc<dyn SupportStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CustomerContextTool {
    fn name(&self) -> &str {
        "get_customer_context"
    }

    fn description(&self) -> &str {
        "Look up the customer's profile and recent ticket history. Useful for account \
         questions and for judging how familiar the customer already is with the product."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "customer_id": {
                    "type": "string",
                    "description": "The customer to look up (defaults to the ticket's customer)"
                }
            }
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        ctx: &RunContext,
    ) -> Result<ToolResult, ToolError> {
        let customer_id = arguments["customer_id"]
            .as_str()
            .unwrap_or(&ctx.customer_id)
            .to_string();

        let profile = match self.store.customer_profile(&customer_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, customer_id = %customer_id, "Customer lookup failed");
                return Ok(ToolResult::failure(
                    "The customer store is temporarily unavailable. Continue with what the \
                     ticket itself tells you.",
                    "customer store unavailable",
                ));
            }
        };

        let Some(profile) = profile else {
            return Ok(ToolResult::text(
                format!("No customer found with id '{customer_id}'."),
                format!("customer '{customer_id}' not found"),
            ));
        };

        let mut output = format!(
            "Customer: {} (id {})\nEmail: {}\nPlan: {}\nCustomer since: {}\n",
            profile.name,
            profile.id,
            profile.email.as_deref().unwrap_or("unknown"),
            profile.plan.as_deref().unwrap_or("unknown"),
            profile.created_at.format("%Y-%m-%d"),
        );

        match self
            .store
            .recent_tickets(&customer_id, RECENT_TICKET_LIMIT)
            .await
        {
            Ok(tickets) if tickets.is_empty() => {
                output.push_str("\nNo prior tickets.\n");
            }
            Ok(tickets) => {
                output.push_str("\nRecent tickets:\n");
                for t in &tickets {
                    output.push_str(&format!(
                        "- #{} {} ({}, opened {})\n",
                        t.id,
                        t.subject,
                        t.status,
                        t.opened_at.format("%Y-%m-%d"),
                    ));
                }
            }
            Err(e) => {
                warn!(error = %e, "Recent tickets lookup failed");
                output.push_str("\nRecent ticket history unavailable.\n");
            }
        }

        let summary = format!("context for customer '{customer_id}'");
        Ok(ToolResult::text(output, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stubs::{ctx, StubStore};
    use chrono::Utc;
    use deskflow_core::support::{CustomerProfile, TicketSummary};

    fn profile() -> CustomerProfile {
        CustomerProfile {
            id: "cus_1".into(),
            name: "Sam Doe".into(),
            email: Some("sam@example.com".into()),
            plan: Some("Business".into()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn renders_profile_and_tickets() {
        let store = StubStore::new().with_profile(profile()).with_tickets(vec![
            TicketSummary {
                id: "tkt_9".into(),
                subject: "Number porting".into(),
                status: "solved".into(),
                opened_at: Utc::now(),
            },
        ]);
        let tool = CustomerContextTool::new(Arc::new(store));

        let result = tool.execute(serde_json::json!({}), &ctx()).await.unwrap();
        assert!(result.success);
        assert!(result.output.contains("Sam Doe"));
        assert!(result.output.contains("Business"));
        assert!(result.output.contains("Number porting"));
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found_text() {
        let tool = CustomerContextTool::new(Arc::new(StubStore::new()));
        let result = tool
            .execute(serde_json::json!({"customer_id": "cus_missing"}), &ctx())
            .await
            .unwrap();
        assert!(result.output.contains("No customer found"));
    }

    #[tokio::test]
    async fn defaults_to_run_context_customer() {
        let store = StubStore::new().with_profile(profile());
        let tool = CustomerContextTool::new(Arc::new(store));
        // ctx() carries customer_id "cus_1"
        let result = tool.execute(serde_json::json!({}), &ctx()).await.unwrap();
        assert!(result.output.contains("Sam Doe"));
    }
}

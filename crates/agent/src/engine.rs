//! The orchestration loop: seed the conversation, alternate completion
//! calls with tool execution, and finish with exactly one terminal result.
//!
//! Every run moves through the same states regardless of surface: seeded,
//! then up to `max_rounds` tool rounds, then one of answered, escalated,
//! timed out, or exhausted. An exhausted run gets one final wrap-up call
//! with tools withheld. The streaming surface reveals buffered answers at a
//! paced cadence and streams the wrap-up call for real, retrying once on a
//! fallback credential when the primary is rate-limited.

use deskflow_config::EngineConfig;
use deskflow_core::completion::{
    CompletionClient, CompletionRequest, StopReason, StreamChunk,
};
use deskflow_core::error::CompletionError;
use deskflow_core::message::{Conversation, Message};
use deskflow_core::support::AgentInput;
use deskflow_core::tool::{RunContext, ToolData};
use deskflow_tools::Dispatcher;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::confidence::{self, TIMEOUT_CONFIDENCE};
use crate::pacing::Pacer;
use crate::prompts::{self, FALLBACK_ANSWER, FINAL_ROUND_INSTRUCTION, TIMEOUT_MESSAGE};
use crate::result::AgentResult;
use crate::session::SessionLedger;
use crate::stream_event::AgentStreamEvent;

/// Where a run's progress events go.
///
/// The buffered surface uses `Null`; the streaming surface uses a
/// capacity-1 channel so a dropped receiver is noticed on the next emit
/// and the run stops doing work nobody will see.
enum EventSink {
    Null,
    Channel(mpsc::Sender<AgentStreamEvent>),
}

impl EventSink {
    /// Emit one event. `false` means the caller abandoned the run.
    async fn emit(&self, event: AgentStreamEvent) -> bool {
        match self {
            Self::Null => true,
            Self::Channel(tx) => tx.send(event).await.is_ok(),
        }
    }

    fn is_streaming(&self) -> bool {
        matches!(self, Self::Channel(_))
    }
}

/// The agent engine. Cheap to clone; clones share the same clients and
/// dispatcher.
#[derive(Clone)]
pub struct AgentEngine {
    completion: Arc<dyn CompletionClient>,
    fallback: Option<Arc<dyn CompletionClient>>,
    dispatcher: Arc<Dispatcher>,
    model: String,
    config: EngineConfig,
}

impl AgentEngine {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        fallback: Option<Arc<dyn CompletionClient>>,
        dispatcher: Arc<Dispatcher>,
        model: String,
        config: EngineConfig,
    ) -> Self {
        Self {
            completion,
            fallback,
            dispatcher,
            model,
            config,
        }
    }

    /// Run to completion and return the buffered result.
    ///
    /// The wall-clock budget is checked at round boundaries only, so a slow
    /// completion call can overrun it by its own latency.
    pub async fn run(&self, input: AgentInput) -> AgentResult {
        self.drive(input, &EventSink::Null).await
    }

    /// Run in streaming mode. The receiver yields progress events followed
    /// by exactly one terminal event; dropping it abandons the run.
    pub fn run_streamed(&self, input: AgentInput) -> mpsc::Receiver<AgentStreamEvent> {
        let (tx, rx) = mpsc::channel(1);
        let engine = self.clone();
        tokio::spawn(async move {
            let sink = EventSink::Channel(tx.clone());
            let terminal = match engine.drive(input, &sink).await {
                AgentResult::Error { message, .. } => AgentStreamEvent::Error { message },
                result => AgentStreamEvent::Complete { result },
            };
            let _ = tx.send(terminal).await;
        });
        rx
    }

    async fn drive(&self, input: AgentInput, sink: &EventSink) -> AgentResult {
        let mut ledger = SessionLedger::new();
        if !self.config.enabled {
            return self.failed("agent engine is disabled".into(), ledger);
        }

        let mut conversation = prompts::seed_conversation(&input);
        info!(
            run_id = %conversation.run_id,
            ticket_id = %input.ticket.id,
            channel = %input.channel,
            streaming = sink.is_streaming(),
            "Starting agent run"
        );

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let definitions = self.dispatcher.definitions();

        for round in 1..=self.config.max_rounds {
            if ledger.elapsed() >= timeout {
                warn!(round, elapsed_ms = ledger.elapsed().as_millis() as u64, "Run timed out");
                return AgentResult::Timeout {
                    text: TIMEOUT_MESSAGE.into(),
                    stats: ledger.finish(TIMEOUT_CONFIDENCE),
                };
            }
            if !sink.emit(AgentStreamEvent::Thinking).await {
                return abandoned(ledger);
            }

            debug!(round, "Requesting completion");
            let request = CompletionRequest {
                model: self.model.clone(),
                messages: conversation.messages.clone(),
                max_tokens: None,
                tools: definitions.clone(),
                stream: false,
            };
            let response = match self.completion.complete(request).await {
                Ok(response) => response,
                Err(e) => return self.failed(e.to_string(), ledger),
            };
            ledger.record_usage(response.usage);

            let message = response.message;
            conversation.push(message.clone());

            if response.stop_reason != StopReason::ToolUse || message.tool_calls.is_empty() {
                info!(round, "Run answered");
                return self.answer(message.content, ledger, sink).await;
            }

            for invocation in &message.tool_calls {
                // Budget short-circuit: the call is neither executed nor
                // recorded, but the model still gets a tool-result turn.
                if ledger.executed_tool_calls() >= self.config.max_total_tool_calls {
                    debug!(tool = %invocation.name, "Tool budget exhausted, short-circuiting");
                    conversation.push(Message::tool_result(
                        &invocation.id,
                        "Tool call limit reached for this conversation. Answer the customer \
                         with the information already gathered.",
                    ));
                    continue;
                }

                let arguments = serde_json::from_str(&invocation.arguments)
                    .unwrap_or(serde_json::Value::Null);
                let description = self
                    .dispatcher
                    .description_of(&invocation.name)
                    .unwrap_or_default();
                if !sink
                    .emit(AgentStreamEvent::ToolCall {
                        name: invocation.name.clone(),
                        description,
                    })
                    .await
                {
                    return abandoned(ledger);
                }

                let ctx = RunContext {
                    ticket_id: input.ticket.id.clone(),
                    customer_id: input.customer.id.clone(),
                    channel: input.channel,
                    prior_tool_calls: ledger.investigative_tool_calls(),
                    web_searches: ledger.web_searches(),
                };
                let (result, record) =
                    self.dispatcher.dispatch(&invocation.name, arguments, &ctx).await;
                if !sink
                    .emit(AgentStreamEvent::ToolResult {
                        name: invocation.name.clone(),
                        success: result.success,
                    })
                    .await
                {
                    return abandoned(ledger);
                }

                if let ToolData::Escalation(payload) = &result.data {
                    let reason = payload.reason.clone();
                    let summary = payload.summary.clone();
                    ledger.record_tool(record, &result.data);

                    // The hand-off notice is short; it is not paced.
                    let text = prompts::escalation_message(&summary);
                    if !sink
                        .emit(AgentStreamEvent::TextDelta {
                            content: text.clone(),
                        })
                        .await
                    {
                        return abandoned(ledger);
                    }
                    let confidence = self.current_confidence(&ledger);
                    info!(round, reason = %reason, "Run escalated");
                    return AgentResult::Escalation {
                        text,
                        reason,
                        summary,
                        stats: ledger.finish(confidence),
                    };
                }

                ledger.record_tool(record, &result.data);
                conversation.push(Message::tool_result(&invocation.id, result.output));
            }
        }

        // Round budget exhausted: one wrap-up call with tools withheld.
        info!(rounds = self.config.max_rounds, "Round budget exhausted, wrapping up");
        conversation.push(Message::user(FINAL_ROUND_INSTRUCTION));
        self.final_answer(conversation, ledger, sink).await
    }

    /// Finish a run whose answer is already complete. On the streaming
    /// surface the text is revealed at a paced cadence.
    async fn answer(&self, text: String, ledger: SessionLedger, sink: &EventSink) -> AgentResult {
        let text = if text.trim().is_empty() {
            warn!("Model returned empty answer text");
            FALLBACK_ANSWER.to_string()
        } else {
            text
        };
        if sink.is_streaming() {
            let pacer = Pacer::new(self.config.chunk_delay_ms, self.config.jitter_ms);
            for chunk in Pacer::chunks(&text) {
                if !sink
                    .emit(AgentStreamEvent::TextDelta { content: chunk })
                    .await
                {
                    return abandoned(ledger);
                }
                pacer.pause().await;
            }
        }
        let confidence = self.current_confidence(&ledger);
        AgentResult::Response {
            text,
            stats: ledger.finish(confidence),
        }
    }

    /// The exhausted path's wrap-up call. Buffered runs make one more
    /// complete call; streaming runs stream it for real.
    async fn final_answer(
        &self,
        conversation: Conversation,
        mut ledger: SessionLedger,
        sink: &EventSink,
    ) -> AgentResult {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: conversation.messages,
            max_tokens: None,
            tools: Vec::new(),
            stream: sink.is_streaming(),
        };

        if !sink.is_streaming() {
            return match self.completion.complete(request).await {
                Ok(response) => {
                    ledger.record_usage(response.usage);
                    self.answer(response.message.content, ledger, sink).await
                }
                Err(e) => self.failed(e.to_string(), ledger),
            };
        }

        let mut retried = false;
        let mut rx = match self.completion.stream(request.clone()).await {
            Ok(rx) => rx,
            Err(e) if e.is_rate_limit() => {
                retried = true;
                match self.fallback_stream(&request, e).await {
                    Ok(rx) => rx,
                    Err(e) => return self.failed(e.to_string(), ledger),
                }
            }
            Err(e) => return self.failed(e.to_string(), ledger),
        };

        let mut text = String::new();
        while let Some(item) = rx.recv().await {
            match item {
                Ok(chunk) => {
                    ledger.record_usage(chunk.usage);
                    if let Some(delta) = chunk.delta {
                        if !delta.is_empty() {
                            if !sink
                                .emit(AgentStreamEvent::TextDelta {
                                    content: delta.clone(),
                                })
                                .await
                            {
                                return abandoned(ledger);
                            }
                            text.push_str(&delta);
                        }
                    }
                    if chunk.done {
                        break;
                    }
                }
                Err(e) if e.is_rate_limit() && !retried => {
                    retried = true;
                    rx = match self.fallback_stream(&request, e).await {
                        Ok(rx) => rx,
                        Err(e) => return self.failed(e.to_string(), ledger),
                    };
                    // Partial output is discarded; the fallback's answer
                    // replaces it in the terminal result.
                    text.clear();
                }
                Err(e) => return self.failed(e.to_string(), ledger),
            }
        }

        if text.trim().is_empty() {
            warn!("Wrap-up stream produced no text");
            if !sink
                .emit(AgentStreamEvent::TextDelta {
                    content: FALLBACK_ANSWER.into(),
                })
                .await
            {
                return abandoned(ledger);
            }
            text = FALLBACK_ANSWER.to_string();
        }

        let confidence = self.current_confidence(&ledger);
        AgentResult::Response {
            text,
            stats: ledger.finish(confidence),
        }
    }

    /// Reopen the wrap-up stream on the fallback credential. Called at most
    /// once per run, whether the primary was rate-limited at open time or
    /// mid-stream; without a fallback the original error stands.
    async fn fallback_stream(
        &self,
        request: &CompletionRequest,
        original: CompletionError,
    ) -> Result<mpsc::Receiver<Result<StreamChunk, CompletionError>>, CompletionError> {
        match &self.fallback {
            Some(fallback) => {
                warn!(
                    client = fallback.name(),
                    "Primary rate-limited on wrap-up call, retrying with fallback"
                );
                fallback.stream(request.clone()).await
            }
            None => Err(original),
        }
    }

    fn current_confidence(&self, ledger: &SessionLedger) -> f32 {
        confidence::estimate(
            ledger.kb_grounded(),
            ledger.search_calls(),
            ledger.web_searches() > 0,
        )
    }

    fn failed(&self, message: String, ledger: SessionLedger) -> AgentResult {
        error!(error = %message, "Run failed");
        AgentResult::Error {
            text: FALLBACK_ANSWER.into(),
            message,
            stats: ledger.finish(0.0),
        }
    }
}

fn abandoned(ledger: SessionLedger) -> AgentResult {
    debug!("Run abandoned by caller");
    AgentResult::Error {
        text: FALLBACK_ANSWER.into(),
        message: "run abandoned by caller".into(),
        stats: ledger.finish(0.0),
    }
}

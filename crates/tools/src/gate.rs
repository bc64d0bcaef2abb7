//! The escalation gate — a channel-aware policy deciding whether the agent
//! has demonstrably tried before deferring to a human.
//!
//! Chat-like channels are the likeliest surface for an impatient "talk to a
//! human" request, so they require the most visible effort. This is a hard
//! gate: rejection prevents the escalation side effect entirely, and is
//! always expressed to the model as actionable next steps.

use deskflow_config::EscalationThresholds;
use deskflow_core::channel::Channel;

/// The gate's verdict on one escalation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Enough prior work — hand off to a human.
    Approved,
    /// Not enough prior work; `required` tool calls must come first.
    Rejected { required: usize },
}

/// Pure decision function over channel and prior tool-call count.
#[derive(Debug, Clone)]
pub struct EscalationGate {
    thresholds: EscalationThresholds,
}

impl EscalationGate {
    pub fn new(thresholds: EscalationThresholds) -> Self {
        Self { thresholds }
    }

    /// Approve or reject an escalation attempt given the channel and the
    /// number of tool calls already executed in the run before this attempt.
    pub fn evaluate(&self, channel: Channel, prior_tool_calls: usize) -> GateDecision {
        let required = self.thresholds.for_channel(channel);
        if prior_tool_calls >= required {
            GateDecision::Approved
        } else {
            GateDecision::Rejected { required }
        }
    }
}

impl Default for EscalationGate {
    fn default() -> Self {
        Self::new(EscalationThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_requires_four_prior_calls() {
        let gate = EscalationGate::default();
        assert_eq!(
            gate.evaluate(Channel::Widget, 0),
            GateDecision::Rejected { required: 4 }
        );
        assert_eq!(
            gate.evaluate(Channel::Widget, 3),
            GateDecision::Rejected { required: 4 }
        );
        assert_eq!(gate.evaluate(Channel::Widget, 4), GateDecision::Approved);
        assert_eq!(gate.evaluate(Channel::Widget, 7), GateDecision::Approved);
    }

    #[test]
    fn email_requires_three() {
        let gate = EscalationGate::default();
        assert_eq!(
            gate.evaluate(Channel::Email, 2),
            GateDecision::Rejected { required: 3 }
        );
        assert_eq!(gate.evaluate(Channel::Email, 3), GateDecision::Approved);
    }

    #[test]
    fn other_channels_require_two() {
        let gate = EscalationGate::default();
        for channel in [Channel::Portal, Channel::Dashboard, Channel::Api] {
            assert_eq!(
                gate.evaluate(channel, 1),
                GateDecision::Rejected { required: 2 }
            );
            assert_eq!(gate.evaluate(channel, 2), GateDecision::Approved);
        }
    }

    #[test]
    fn thresholds_come_from_config() {
        let gate = EscalationGate::new(EscalationThresholds {
            realtime_min_tool_calls: 1,
            async_min_tool_calls: 1,
            default_min_tool_calls: 0,
        });
        assert_eq!(gate.evaluate(Channel::Widget, 1), GateDecision::Approved);
        assert_eq!(gate.evaluate(Channel::Portal, 0), GateDecision::Approved);
    }
}

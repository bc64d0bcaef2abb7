//! Channel — the closed set of delivery surfaces a ticket can arrive on.
//!
//! The channel selects both the system instruction's tone/length rules and
//! the escalation gate's minimum-tool-calls threshold. Adding a channel
//! requires defining both, so this is a closed enum rather than an open
//! string.

use serde::{Deserialize, Serialize};

/// Where the customer's message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Inbound email
    Email,
    /// The embedded chat widget
    Widget,
    /// The self-service customer portal
    Portal,
    /// The internal agent dashboard
    Dashboard,
    /// Direct API integration
    Api,
}

/// Policy grouping of channels: how impatient is the surface, and how much
/// visible effort must the agent show before deferring to a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelClass {
    /// Chat-like, low-latency surfaces — the likeliest place for an
    /// impatient "talk to a human" request
    Realtime,
    /// Asynchronous surfaces where a delayed reply is expected
    Async,
    /// Everything else
    Standard,
}

impl Channel {
    /// The policy class for this channel.
    pub fn class(&self) -> ChannelClass {
        match self {
            Self::Widget => ChannelClass::Realtime,
            Self::Email => ChannelClass::Async,
            Self::Portal | Self::Dashboard | Self::Api => ChannelClass::Standard,
        }
    }

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Widget => "widget",
            Self::Portal => "portal",
            Self::Dashboard => "dashboard",
            Self::Api => "api",
        }
    }

    /// All channels, for exhaustive policy tests.
    pub fn all() -> [Channel; 5] {
        [
            Self::Email,
            Self::Widget,
            Self::Portal,
            Self::Dashboard,
            Self::Api,
        ]
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(Self::Email),
            "widget" => Ok(Self::Widget),
            "portal" => Ok(Self::Portal),
            "dashboard" => Ok(Self::Dashboard),
            "api" => Ok(Self::Api),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_is_the_only_realtime_channel() {
        for channel in Channel::all() {
            let expected = matches!(channel, Channel::Widget);
            assert_eq!(channel.class() == ChannelClass::Realtime, expected);
        }
    }

    #[test]
    fn email_is_async() {
        assert_eq!(Channel::Email.class(), ChannelClass::Async);
        assert_eq!(Channel::Portal.class(), ChannelClass::Standard);
        assert_eq!(Channel::Api.class(), ChannelClass::Standard);
    }

    #[test]
    fn roundtrip_names() {
        for channel in Channel::all() {
            let parsed: Channel = channel.as_str().parse().unwrap();
            assert_eq!(parsed, channel);
        }
        assert!("carrier-pigeon".parse::<Channel>().is_err());
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&Channel::Widget).unwrap();
        assert_eq!(json, r#""widget""#);
    }
}

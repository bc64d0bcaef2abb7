//! Completion-service clients for deskflow.
//!
//! All clients implement the `deskflow_core::CompletionClient` trait.
//! `client_pair` builds the primary and optional fallback client from
//! configuration; the engine retries the final streamed call against the
//! fallback exactly once when the primary is rate-limited.

pub mod anthropic;

pub use anthropic::AnthropicClient;

use deskflow_config::AppConfig;
use deskflow_core::completion::CompletionClient;
use deskflow_core::error::CompletionError;
use std::sync::Arc;

/// Build the primary and optional fallback client from configuration.
pub fn client_pair(
    config: &AppConfig,
) -> Result<(Arc<dyn CompletionClient>, Option<Arc<dyn CompletionClient>>), CompletionError> {
    let api_key = config.api_key.as_deref().ok_or_else(|| {
        CompletionError::NotConfigured("no completion-service API key configured".into())
    })?;

    let primary: Arc<dyn CompletionClient> = Arc::new(AnthropicClient::new(api_key));
    let fallback: Option<Arc<dyn CompletionClient>> =
        config.fallback_api_key.as_deref().map(|key| {
            Arc::new(AnthropicClient::new(key).with_client_name("anthropic-fallback"))
                as Arc<dyn CompletionClient>
        });

    Ok((primary, fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_requires_primary_key() {
        let config = AppConfig::default();
        let err = client_pair(&config).err().unwrap();
        assert!(matches!(err, CompletionError::NotConfigured(_)));
    }

    #[test]
    fn pair_without_fallback() {
        let config = AppConfig {
            api_key: Some("sk-primary".into()),
            ..AppConfig::default()
        };
        let (primary, fallback) = client_pair(&config).unwrap();
        assert_eq!(primary.name(), "anthropic");
        assert!(fallback.is_none());
    }

    #[test]
    fn pair_with_fallback() {
        let config = AppConfig {
            api_key: Some("sk-primary".into()),
            fallback_api_key: Some("sk-secondary".into()),
            ..AppConfig::default()
        };
        let (_, fallback) = client_pair(&config).unwrap();
        assert_eq!(fallback.unwrap().name(), "anthropic-fallback");
    }
}

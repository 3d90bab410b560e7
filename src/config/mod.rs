//! Gateway configuration
//!
//! Configuration is environment-driven, matching how the deployment target
//! provisions credentials. A `.env` file is honored when present.

pub mod credentials;

use std::env;
use std::time::Duration;

use crate::core::providers::ProviderFamily;
use crate::utils::error::{GatewayError, Result};

/// Default per-invocation deadline in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default attempt budget for a top-level call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Runtime configuration for the rotation gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Deadline applied to every single provider invocation
    pub request_timeout: Duration,
    /// Attempt budget used when a caller does not supply one
    pub max_retries: u32,
    /// Model override for Gemini providers
    pub gemini_model: Option<String>,
    /// Model override for OpenAI providers
    pub openai_model: Option<String>,
    /// Model override for Claude providers
    pub claude_model: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            gemini_model: None,
            openai_model: None,
            claude_model: None,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads `.env` first (existing process variables win), then reads
    /// `AI_REQUEST_TIMEOUT_SECS`, `AI_MAX_RETRIES`, and the per-family
    /// `*_MODEL` overrides. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(secs) = env::var("AI_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid request timeout: {}", e)))?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Ok(retries) = env::var("AI_MAX_RETRIES") {
            config.max_retries = retries
                .parse()
                .map_err(|e| GatewayError::Config(format!("Invalid max retries: {}", e)))?;
        }

        if let Ok(model) = env::var("GEMINI_MODEL") {
            config.gemini_model = Some(model);
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            config.openai_model = Some(model);
        }
        if let Ok(model) = env::var("CLAUDE_MODEL") {
            config.claude_model = Some(model);
        }

        Ok(config)
    }

    /// Resolve the model to request for a provider family.
    pub fn model_for(&self, family: ProviderFamily) -> String {
        let override_ = match family {
            ProviderFamily::Gemini => &self.gemini_model,
            ProviderFamily::OpenAi => &self.openai_model,
            ProviderFamily::Claude => &self.claude_model,
        };
        override_
            .clone()
            .unwrap_or_else(|| family.default_model().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn test_model_for_uses_default_without_override() {
        let config = GatewayConfig::default();
        assert_eq!(config.model_for(ProviderFamily::Gemini), "gemini-flash-latest");
        assert_eq!(config.model_for(ProviderFamily::OpenAi), "gpt-3.5-turbo");
        assert_eq!(
            config.model_for(ProviderFamily::Claude),
            "claude-3-haiku-20240307"
        );
    }

    #[test]
    fn test_model_for_honors_override() {
        let config = GatewayConfig {
            openai_model: Some("gpt-4o-mini".to_string()),
            ..GatewayConfig::default()
        };
        assert_eq!(config.model_for(ProviderFamily::OpenAi), "gpt-4o-mini");
        assert_eq!(config.model_for(ProviderFamily::Gemini), "gemini-flash-latest");
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        env::set_var("AI_REQUEST_TIMEOUT_SECS", "not-a-number");
        let result = GatewayConfig::from_env();
        env::remove_var("AI_REQUEST_TIMEOUT_SECS");

        assert!(matches!(result, Err(GatewayError::Config(_))));
    }
}

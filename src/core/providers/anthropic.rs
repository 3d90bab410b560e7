//! Anthropic Claude invoker
//!
//! Messages endpoint with `x-api-key` authentication. The system prompt
//! travels in the top-level `system` field rather than as a message.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::timeout;

use super::{http_client, truncate_body, ProviderInvoker};
use crate::utils::error::InvokeError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicInvoker {
    api_key: String,
    model: String,
    base_url: String,
    request_timeout: Duration,
    http: Client,
}

impl AnthropicInvoker {
    /// Create an invoker against the public Anthropic endpoint.
    pub fn new(api_key: String, model: String, request_timeout: Duration) -> Result<Self, InvokeError> {
        Self::with_base_url(api_key, model, request_timeout, DEFAULT_BASE_URL.to_string())
    }

    /// Create an invoker against a custom base URL (proxies, tests).
    pub fn with_base_url(
        api_key: String,
        model: String,
        request_timeout: Duration,
        base_url: String,
    ) -> Result<Self, InvokeError> {
        Ok(Self {
            http: http_client(request_timeout)?,
            api_key,
            model,
            base_url,
            request_timeout,
        })
    }

    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> Value {
        let mut body = json!({
            "model": self.model,
            "max_tokens": 2000,
            "messages": [{ "role": "user", "content": user_prompt }]
        });
        if !system_prompt.is_empty() {
            body["system"] = json!(system_prompt);
        }
        body
    }

    fn extract_text(&self, response: &Value) -> Result<String, InvokeError> {
        response
            .get("content")
            .and_then(|c| c.get(0))
            .and_then(|block| block.get("text"))
            .and_then(|t| t.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                InvokeError::Parse("No text block in Anthropic response".to_string())
            })
    }
}

#[async_trait::async_trait]
impl ProviderInvoker for AnthropicInvoker {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, InvokeError> {
        let body = self.build_request(system_prompt, user_prompt);
        tracing::debug!(model = %self.model, "Sending Anthropic completion request");

        let response = timeout(
            self.request_timeout,
            self.http
                .post(format!("{}/v1/messages", self.base_url))
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| InvokeError::Timeout(self.request_timeout.as_secs()))?
        .map_err(|e| InvokeError::Network(format!("Anthropic request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            InvokeError::Network(format!("Failed to read Anthropic response: {}", e))
        })?;

        if !status.is_success() {
            return Err(InvokeError::Http {
                status: status.as_u16(),
                message: truncate_body(&text),
            });
        }

        let parsed: Value = serde_json::from_str(&text)
            .map_err(|e| InvokeError::Parse(format!("Invalid Anthropic response JSON: {}", e)))?;

        self.extract_text(&parsed)
    }
}

//! OpenAI invoker
//!
//! Chat-completions endpoint with Bearer authentication.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::timeout;

use super::{http_client, truncate_body, ProviderInvoker};
use crate::utils::error::InvokeError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI API client
#[derive(Debug, Clone)]
pub struct OpenAiInvoker {
    api_key: String,
    model: String,
    base_url: String,
    request_timeout: Duration,
    http: Client,
}

impl OpenAiInvoker {
    /// Create an invoker against the public OpenAI endpoint.
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
        let mut messages = Vec::new();
        if !system_prompt.is_empty() {
            messages.push(json!({ "role": "system", "content": system_prompt }));
        }
        messages.push(json!({ "role": "user", "content": user_prompt }));

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.7,
            "max_tokens": 2000
        })
    }

    fn extract_text(&self, response: &Value) -> Result<String, InvokeError> {
        response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| InvokeError::Parse("No message content in OpenAI response".to_string()))
    }
}

#[async_trait::async_trait]
impl ProviderInvoker for OpenAiInvoker {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, InvokeError> {
        let body = self.build_request(system_prompt, user_prompt);
        tracing::debug!(model = %self.model, "Sending OpenAI completion request");

        let response = timeout(
            self.request_timeout,
            self.http
                .post(format!("{}/v1/chat/completions", self.base_url))
                .bearer_auth(&self.api_key)
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| InvokeError::Timeout(self.request_timeout.as_secs()))?
        .map_err(|e| InvokeError::Network(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| InvokeError::Network(format!("Failed to read OpenAI response: {}", e)))?;

        if !status.is_success() {
            return Err(InvokeError::Http {
                status: status.as_u16(),
                message: truncate_body(&text),
            });
        }

        let parsed: Value = serde_json::from_str(&text)
            .map_err(|e| InvokeError::Parse(format!("Invalid OpenAI response JSON: {}", e)))?;

        self.extract_text(&parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoker() -> OpenAiInvoker {
        OpenAiInvoker::new(
            "test-key".to_string(),
            "gpt-3.5-turbo".to_string(),
            Duration::from_secs(30),
        )
        .unwrap()
    }

    #[test]
    fn test_request_includes_system_message() {
        let body = invoker().build_request("You are terse.", "Hi");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
    }

    #[test]
    fn test_request_omits_empty_system_message() {
        let body = invoker().build_request("", "Hi");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
    }

    #[test]
    fn test_extract_text() {
        let response = json!({
            "choices": [{ "message": { "role": "assistant", "content": "hello" } }]
        });
        assert_eq!(invoker().extract_text(&response).unwrap(), "hello");
    }

    #[test]
    fn test_extract_text_missing_choices() {
        let err = invoker().extract_text(&json!({})).unwrap_err();
        assert!(matches!(err, InvokeError::Parse(_)));
    }
}

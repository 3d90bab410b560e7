//! Gemini invoker
//!
//! Talks to the Google AI Studio `generateContent` endpoint. Gemini has no
//! separate system role in this call shape, so the system prompt is
//! prepended to the user prompt.

use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::time::timeout;

use super::{http_client, truncate_body, ProviderInvoker};
use crate::utils::error::InvokeError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiInvoker {
    api_key: String,
    model: String,
    base_url: String,
    request_timeout: Duration,
    http: Client,
}

impl GeminiInvoker {
    /// Create an invoker against the public Google AI Studio endpoint.
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

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(&self, system_prompt: &str, user_prompt: &str) -> Value {
        let full_prompt = if system_prompt.is_empty() {
            user_prompt.to_string()
        } else {
            format!("{}\n\n{}", system_prompt, user_prompt)
        };

        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": full_prompt }]
            }]
        })
    }

    fn extract_text(&self, response: &Value) -> Result<String, InvokeError> {
        // Gemini reports some errors with a 200 status and an error object
        if let Some(error) = response.get("error") {
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown Gemini error");
            let code = error.get("code").and_then(|c| c.as_u64()).unwrap_or(0);
            return Err(InvokeError::Http {
                status: code as u16,
                message: message.to_string(),
            });
        }

        let parts = response
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .ok_or_else(|| InvokeError::Parse("No candidates in Gemini response".to_string()))?;

        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
            .collect();

        if text.is_empty() {
            return Err(InvokeError::Parse(
                "Gemini candidate contained no text parts".to_string(),
            ));
        }

        Ok(text)
    }
}

#[async_trait::async_trait]
impl ProviderInvoker for GeminiInvoker {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, InvokeError> {
        let body = self.build_request(system_prompt, user_prompt);
        tracing::debug!(model = %self.model, "Sending Gemini completion request");

        let response = timeout(
            self.request_timeout,
            self.http.post(self.endpoint()).json(&body).send(),
        )
        .await
        .map_err(|_| InvokeError::Timeout(self.request_timeout.as_secs()))?
        .map_err(|e| InvokeError::Network(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| InvokeError::Network(format!("Failed to read Gemini response: {}", e)))?;

        if !status.is_success() {
            return Err(InvokeError::Http {
                status: status.as_u16(),
                message: truncate_body(&text),
            });
        }

        let parsed: Value = serde_json::from_str(&text)
            .map_err(|e| InvokeError::Parse(format!("Invalid Gemini response JSON: {}", e)))?;

        self.extract_text(&parsed)
    }
}

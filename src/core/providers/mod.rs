//! Provider family adapters
//!
//! Each supported family gets one invoker implementation with its own
//! request/response shape. Families are a closed enum resolved at
//! pool-construction time; a family compiled out via its cargo feature
//! still occupies its pool slots but fails every invocation with a clearly
//! labeled "unavailable" error, so rotation routes around it instead of
//! the whole binary refusing to start.

#[cfg(feature = "anthropic")]
pub mod anthropic;
#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "openai")]
pub mod openai;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utils::error::InvokeError;

/// Provider family enumeration.
///
/// Determines which adapter handles a provider and which environment base
/// key its credentials are discovered under. The variant order here is the
/// pool discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderFamily {
    /// Google Gemini
    Gemini,
    /// OpenAI
    OpenAi,
    /// Anthropic Claude
    Claude,
}

impl ProviderFamily {
    /// All supported families, in fixed discovery order.
    pub fn all() -> &'static [ProviderFamily] {
        &[
            ProviderFamily::Gemini,
            ProviderFamily::OpenAi,
            ProviderFamily::Claude,
        ]
    }

    /// Base environment variable name for this family's credentials.
    pub fn env_base(&self) -> &'static str {
        match self {
            ProviderFamily::Gemini => "GEMINI_API_KEY",
            ProviderFamily::OpenAi => "OPENAI_API_KEY",
            ProviderFamily::Claude => "CLAUDE_API_KEY",
        }
    }

    /// Model requested when no override is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderFamily::Gemini => "gemini-flash-latest",
            ProviderFamily::OpenAi => "gpt-3.5-turbo",
            ProviderFamily::Claude => "claude-3-haiku-20240307",
        }
    }

    /// Human-readable family label used in provider display names.
    pub fn label(&self) -> &'static str {
        match self {
            ProviderFamily::Gemini => "Google Gemini",
            ProviderFamily::OpenAi => "OpenAI",
            ProviderFamily::Claude => "Claude",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderFamily::Gemini => write!(f, "gemini"),
            ProviderFamily::OpenAi => write!(f, "openai"),
            ProviderFamily::Claude => write!(f, "claude"),
        }
    }
}

/// One-shot completion interface implemented per family.
///
/// Implementations perform exactly one outbound request bounded by the
/// configured deadline. Retry and rotation policy live entirely in the
/// rotation manager, never here.
#[async_trait]
pub trait ProviderInvoker: Send + Sync + fmt::Debug {
    /// Issue a single completion request and return the plain-text answer.
    async fn complete(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, InvokeError>;
}

/// Invoker that stands in for a family compiled out of the binary.
#[derive(Debug)]
pub struct UnavailableInvoker {
    family: ProviderFamily,
}

#[async_trait]
impl ProviderInvoker for UnavailableInvoker {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, InvokeError> {
        Err(InvokeError::Unavailable(format!(
            "{} support is not compiled into this build",
            self.family.label()
        )))
    }
}

/// Build the invoker for one configured provider.
///
/// Resolution happens once, at pool-construction time. Building never fails
/// for a disabled family; the resulting invoker fails per invocation
/// instead, which keeps the rest of the pool usable.
pub fn build_invoker(
    family: ProviderFamily,
    credential: &str,
    model: &str,
    timeout: Duration,
) -> Result<Arc<dyn ProviderInvoker>, InvokeError> {
    match family {
        #[cfg(feature = "gemini")]
        ProviderFamily::Gemini => Ok(Arc::new(gemini::GeminiInvoker::new(
            credential.to_string(),
            model.to_string(),
            timeout,
        )?)),
        #[cfg(feature = "openai")]
        ProviderFamily::OpenAi => Ok(Arc::new(openai::OpenAiInvoker::new(
            credential.to_string(),
            model.to_string(),
            timeout,
        )?)),
        #[cfg(feature = "anthropic")]
        ProviderFamily::Claude => Ok(Arc::new(anthropic::AnthropicInvoker::new(
            credential.to_string(),
            model.to_string(),
            timeout,
        )?)),
        #[allow(unreachable_patterns)]
        _ => Ok(Arc::new(UnavailableInvoker { family })),
    }
}

/// Build an HTTP client with the shared timeout settings for one family.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, InvokeError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| InvokeError::Network(format!("Failed to create HTTP client: {}", e)))
}

/// Truncate a provider error body for diagnostics.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 512;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    }
}

//! Shared gateway types

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::providers::ProviderFamily;

/// Result of a successful gateway call.
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    /// Plain-text completion returned by the provider
    pub text: String,
    /// Stable id of the provider that answered (e.g. `gemini_2`)
    pub provider_id: String,
    /// Display name of the provider that answered
    pub provider_name: String,
}

/// Point-in-time view of one provider, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderSnapshot {
    /// Stable provider id
    pub id: String,
    /// Display name
    pub name: String,
    /// Provider family
    pub family: ProviderFamily,
    /// Whether the provider is currently eligible for selection
    pub active: bool,
    /// Consecutive failures since the last success
    pub error_count: u32,
    /// Timestamp of the most recent failure, if any
    pub last_error_at: Option<DateTime<Utc>>,
}

/// Read-only snapshot of the whole pool.
#[derive(Debug, Clone, Serialize)]
pub struct PoolStats {
    /// Total configured providers
    pub total_providers: usize,
    /// Providers currently eligible for selection
    pub active_providers: usize,
    /// Display name of the provider the cursor would select next
    pub current_provider: String,
    /// Per-provider snapshots in pool order
    pub providers: Vec<ProviderSnapshot>,
}

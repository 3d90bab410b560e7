//! Failure classification
//!
//! Quota exhaustion is detected by substring matching against the rendered
//! failure message. Provider error formats are not contractual, so this
//! stays a heuristic; it is isolated here so it can be swapped for
//! structured error codes if providers ever expose them.

use crate::utils::error::InvokeError;

/// Message fragments indicating exhausted capacity or billing problems.
const QUOTA_PATTERNS: &[&str] = &[
    "quota",
    "rate limit",
    "too many requests",
    "429",
    "resource exhausted",
    "limit exceeded",
    "quota exceeded",
    "billing",
    "insufficient quota",
];

/// Check whether a failure message indicates quota exhaustion.
///
/// Case-insensitive. A match means the provider should be rotated away from
/// immediately instead of getting a same-provider retry.
pub fn is_quota_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    QUOTA_PATTERNS.iter().any(|p| lowered.contains(p))
}

/// Classify an invocation failure.
pub fn is_quota_error(error: &InvokeError) -> bool {
    is_quota_message(&error.to_string())
}

//! Provider rotation
//!
//! Owns the ordered provider pool, tracks per-provider health, and retries
//! completion calls across providers so one exhausted key or a provider
//! outage does not fail the overall request.
//!
//! The manager is built once by the composition root and shared
//! process-wide. Pool state lives behind a mutex; the lock is never held
//! across an outbound request, and attempt outcomes are recorded by
//! provider id, so concurrent callers cannot double-suspend a provider or
//! race the cursor.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::classify;
use super::providers::{build_invoker, ProviderFamily, ProviderInvoker};
use super::types::{Completion, PoolStats, ProviderSnapshot};
use crate::config::credentials::{discover_all, masked};
use crate::config::GatewayConfig;
use crate::utils::error::{GatewayError, Result};

/// Consecutive failures after which a provider gets a louder warning.
/// Informational only: suspension already routes traffic around it.
const ERROR_STREAK_WARN_THRESHOLD: u32 = 3;

/// One configured, credentialed provider with its runtime health state.
///
/// `id` is immutable for the pool's lifetime; `active`, `error_count`, and
/// `last_error_at` are updated exclusively by the rotation manager.
#[derive(Debug)]
pub struct Provider {
    id: String,
    family: ProviderFamily,
    name: String,
    model: String,
    invoker: Arc<dyn ProviderInvoker>,
    active: bool,
    error_count: u32,
    last_error_at: Option<DateTime<Utc>>,
}

impl Provider {
    /// Create a provider with an id and display name derived from its
    /// family and 1-based ordinal (`gemini_2`, "Google Gemini 2").
    pub fn new(
        family: ProviderFamily,
        ordinal: usize,
        model: String,
        invoker: Arc<dyn ProviderInvoker>,
    ) -> Self {
        Self {
            id: format!("{}_{}", family, ordinal),
            family,
            name: format!("{} {}", family.label(), ordinal),
            model,
            invoker,
            active: true,
            error_count: 0,
            last_error_at: None,
        }
    }

    /// Stable provider id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model requested from this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn snapshot(&self) -> ProviderSnapshot {
        ProviderSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            family: self.family,
            active: self.active,
            error_count: self.error_count,
            last_error_at: self.last_error_at,
        }
    }
}

struct PoolState {
    providers: Vec<Provider>,
    current_index: usize,
}

impl PoolState {
    /// Find the first active provider starting at the cursor, wrapping
    /// around. When every provider is suspended, reactivate the whole pool
    /// and fall back to provider 0 so a total outage cannot wedge the pool.
    fn select(&mut self) -> Result<usize> {
        if self.providers.is_empty() {
            return Err(GatewayError::Config(
                "No AI providers configured. Set at least one of GEMINI_API_KEY, \
                 OPENAI_API_KEY or CLAUDE_API_KEY"
                    .to_string(),
            ));
        }

        let len = self.providers.len();
        for offset in 0..len {
            let idx = (self.current_index + offset) % len;
            if self.providers[idx].active {
                self.current_index = idx;
                return Ok(idx);
            }
        }

        warn!("No active providers left; reactivating the whole pool");
        for provider in &mut self.providers {
            provider.active = true;
            provider.error_count = 0;
        }
        self.current_index = 0;
        Ok(0)
    }

    /// Suspend the named provider, advance the cursor past it if it is the
    /// current one, and select the next eligible provider.
    fn suspend_and_advance(&mut self, provider_id: &str, reason: &str) -> Result<usize> {
        if let Some(idx) = self.providers.iter().position(|p| p.id == provider_id) {
            let len = self.providers.len();
            let provider = &mut self.providers[idx];
            provider.active = false;
            provider.error_count += 1;
            provider.last_error_at = Some(Utc::now());

            warn!(
                provider = %provider.name,
                reason = %reason,
                "Rotating away from provider"
            );
            if provider.error_count >= ERROR_STREAK_WARN_THRESHOLD {
                warn!(
                    provider = %provider.name,
                    consecutive_errors = provider.error_count,
                    "Provider suspended repeatedly"
                );
            }

            if self.current_index == idx {
                self.current_index = (self.current_index + 1) % len;
            }
        }
        self.select()
    }

    /// Read-only view of the provider the cursor would select next.
    /// Unlike [`select`], never reactivates a fully suspended pool.
    fn peek_current(&self) -> Option<&Provider> {
        if self.providers.is_empty() {
            return None;
        }
        let len = self.providers.len();
        for offset in 0..len {
            let idx = (self.current_index + offset) % len;
            if self.providers[idx].active {
                return Some(&self.providers[idx]);
            }
        }
        self.providers.first()
    }
}

/// Rotation manager: selects providers, classifies failures, and retries
/// with automatic failover.
///
/// Construct one per process and share it (`Arc<RotationManager>`); the
/// provider pool is built lazily from the environment on first use, or
/// injected via [`RotationManager::with_providers`].
pub struct RotationManager {
    config: GatewayConfig,
    pool: OnceCell<Mutex<PoolState>>,
}

impl RotationManager {
    /// Create a manager whose pool is discovered from the environment on
    /// first use.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    /// Create a manager over an explicit provider list.
    ///
    /// Used by composition roots that build providers themselves and by
    /// tests injecting scripted invokers.
    pub fn with_providers(config: GatewayConfig, providers: Vec<Provider>) -> Self {
        let manager = Self {
            config,
            pool: OnceCell::new(),
        };
        let _ = manager.pool.set(Mutex::new(PoolState {
            providers,
            current_index: 0,
        }));
        manager
    }

    fn pool(&self) -> Result<&Mutex<PoolState>> {
        self.pool.get_or_try_init(|| {
            let providers = self.build_pool_from_env()?;
            Ok(Mutex::new(PoolState {
                providers,
                current_index: 0,
            }))
        })
    }

    fn build_pool_from_env(&self) -> Result<Vec<Provider>> {
        let discovered = discover_all();
        if discovered.is_empty() {
            return Err(GatewayError::Config(
                "No AI providers configured. Set at least one of GEMINI_API_KEY, \
                 OPENAI_API_KEY or CLAUDE_API_KEY"
                    .to_string(),
            ));
        }

        let mut providers = Vec::with_capacity(discovered.len());
        for entry in discovered {
            let model = self.config.model_for(entry.family);
            let invoker = build_invoker(
                entry.family,
                &entry.key,
                &model,
                self.config.request_timeout,
            )
            .map_err(|e| {
                GatewayError::Config(format!(
                    "Failed to initialize {} provider: {}",
                    entry.family, e
                ))
            })?;

            let provider = Provider::new(entry.family, entry.ordinal, model, invoker);
            info!(
                provider = %provider.name,
                id = %provider.id,
                model = %provider.model,
                key = %masked(&entry.key),
                "Initialized AI provider"
            );
            providers.push(provider);
        }

        info!(total = providers.len(), "AI provider pool ready");
        Ok(providers)
    }

    /// Snapshot of the provider that would serve the next call.
    ///
    /// Performs real selection: a fully suspended pool is reactivated here,
    /// exactly as on the call path.
    pub fn current_provider(&self) -> Result<ProviderSnapshot> {
        let mut state = self.pool()?.lock();
        let idx = state.select()?;
        Ok(state.providers[idx].snapshot())
    }

    /// Manually suspend the current provider and move to the next one.
    ///
    /// Exposed for operational tooling; the call path uses the same
    /// mechanism internally after classified failures.
    pub fn rotate_to_next(&self, reason: &str) -> Result<ProviderSnapshot> {
        let mut state = self.pool()?.lock();
        let idx = state.select()?;
        let id = state.providers[idx].id.clone();
        let next = state.suspend_and_advance(&id, reason)?;
        Ok(state.providers[next].snapshot())
    }

    /// Call the current provider, rotating on failure, up to `max_retries`
    /// attempts (the configured default when `None`).
    ///
    /// Quota-classified failures rotate immediately; generic failures get
    /// one same-provider retry first. Only the final aggregate failure
    /// crosses this boundary.
    pub async fn call_with_rotation(
        &self,
        user_prompt: &str,
        system_prompt: &str,
        max_retries: Option<u32>,
    ) -> Result<Completion> {
        let max_retries = max_retries.unwrap_or(self.config.max_retries);
        let mut attempts = 0u32;
        let mut last_error = String::from("no attempts were made");

        while attempts < max_retries {
            let (id, name, invoker) = {
                let mut state = self.pool()?.lock();
                let idx = state.select()?;
                let provider = &state.providers[idx];
                (
                    provider.id.clone(),
                    provider.name.clone(),
                    Arc::clone(&provider.invoker),
                )
            };
            attempts += 1;

            info!(
                provider = %name,
                attempt = attempts,
                max_attempts = max_retries,
                "Calling AI provider"
            );
            let started = Instant::now();

            match invoker.complete(system_prompt, user_prompt).await {
                Ok(text) => {
                    let mut state = self.pool()?.lock();
                    if let Some(provider) = state.providers.iter_mut().find(|p| p.id == id) {
                        provider.error_count = 0;
                    }
                    debug!(
                        provider = %name,
                        latency_ms = started.elapsed().as_millis() as u64,
                        "Provider call succeeded"
                    );
                    return Ok(Completion {
                        text,
                        provider_id: id,
                        provider_name: name,
                    });
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!(
                        provider = %name,
                        latency_ms = started.elapsed().as_millis() as u64,
                        error = %message,
                        "Provider call failed"
                    );

                    let mut state = self.pool()?.lock();
                    if classify::is_quota_error(&err) {
                        state.suspend_and_advance(&id, &format!("quota exhausted: {}", message))?;
                    } else if attempts >= 2 {
                        state.suspend_and_advance(&id, &format!("error: {}", message))?;
                    }
                    // First generic failure: retry the same provider once
                    last_error = message;
                }
            }
        }

        Err(GatewayError::AllProvidersFailed {
            attempts,
            last_error,
        })
    }

    /// Read-only snapshot of the pool for diagnostics.
    ///
    /// Triggers lazy pool construction but never mutates provider health;
    /// the current-provider name is computed without moving the cursor.
    pub fn stats(&self) -> Result<PoolStats> {
        let state = self.pool()?.lock();
        let current_provider = state
            .peek_current()
            .map(|p| p.name.clone())
            .unwrap_or_default();

        Ok(PoolStats {
            total_providers: state.providers.len(),
            active_providers: state.providers.iter().filter(|p| p.active).count(),
            current_provider,
            providers: state.providers.iter().map(Provider::snapshot).collect(),
        })
    }
}

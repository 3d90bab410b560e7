//! # promptgate
//!
//! Multi-provider AI gateway with automatic credential rotation and
//! failover. Providers (and multiple API keys per provider family) are
//! discovered from the environment, tried in order, and rotated away from
//! on quota exhaustion or repeated failure, so one dead key does not fail
//! the overall request.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use promptgate::{GatewayConfig, RotationManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     promptgate::init_logging();
//!
//!     let manager = RotationManager::new(GatewayConfig::from_env()?);
//!     let completion = manager
//!         .call_with_rotation("Dame las ventas de hoy", "Answer only in JSON.", None)
//!         .await?;
//!
//!     println!("{} answered: {}", completion.provider_name, completion.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Credential discovery
//!
//! Each family reads a base key plus contiguous numbered suffixes:
//! `GEMINI_API_KEY`, `GEMINI_API_KEY_1`, `GEMINI_API_KEY_2`, ... (same for
//! `OPENAI_API_KEY` and `CLAUDE_API_KEY`). Discovery stops at the first
//! gap. No keys at all is a fatal configuration error.

#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod utils;

pub use crate::config::credentials::keys_from_env;
pub use crate::config::GatewayConfig;
pub use crate::core::extract::extract_json_payload;
pub use crate::core::providers::{ProviderFamily, ProviderInvoker};
pub use crate::core::{Completion, PoolStats, Provider, ProviderSnapshot, RotationManager};
pub use crate::utils::error::{GatewayError, InvokeError, Result};
pub use crate::utils::logging::init_logging;

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

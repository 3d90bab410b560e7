//! Shared utilities

pub mod error;
pub mod logging;

pub use error::{GatewayError, InvokeError, Result};

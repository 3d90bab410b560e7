//! Logging initialization
//!
//! Installs a `tracing` subscriber driven by `RUST_LOG`. Library code only
//! emits `tracing` events; binaries embedding the gateway call
//! [`init_logging`] once from their composition root.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// Reads `RUST_LOG` for filtering, defaulting to `info`. Safe to call more
/// than once; subsequent calls are no-ops.
pub fn init_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}

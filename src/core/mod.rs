//! Core gateway functionality

pub mod classify;
pub mod extract;
pub mod providers;
pub mod rotation;
pub mod types;

pub use rotation::{Provider, RotationManager};
pub use types::{Completion, PoolStats, ProviderSnapshot};

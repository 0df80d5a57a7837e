//! In-memory implementations of the tenant operator's store and API traits,
//! for testing and local development

mod control_plane;
mod store;

pub use control_plane::{ApiCall, InMemoryControlPlane};
pub use store::InMemoryStore;

/// Configuration for the in-memory store
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfig {
    /// Whether to enable verbose logging
    pub verbose: bool,
}

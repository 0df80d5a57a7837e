//! # Tenant Operator Core
//!
//! Types, store/API traits and the reconciliation logic that keeps a remote
//! tenant account, its administrator and its access-credential secret in
//! line with a declared `Tenant` record. Adapters and connectors implement
//! the traits defined here.

pub mod types;
pub mod tenant;
pub mod account;
pub mod traits;
pub mod errors;
pub mod lookup;
pub mod admin_url;
pub mod credentials;
pub mod reconciler;

// Re-export commonly used types and traits
pub use types::{ObjectKey, ObjectMeta, OwnerReference, Secret};
pub use tenant::{Tenant, TenantSpec, TenantStatus};
pub use traits::{AccountApi, AccountApiFactory, SecretStore, TenantStore};
pub use errors::{ApiError, CoreError, ReconcileError, Stage, StoreError};
pub use lookup::Lookup;
pub use reconciler::{ReconcileReport, ReconcilerOptions, TenantReconciler};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::types::*;
    pub use crate::tenant::*;
    pub use crate::account::*;
    pub use crate::traits::*;
    pub use crate::errors::*;
    pub use crate::lookup::Lookup;
    pub use crate::reconciler::*;
    pub use async_trait::async_trait;
}

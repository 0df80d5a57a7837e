//! Interfaces the reconciler consumes

use crate::account::{Account, AccountUpdate, Application, NewAccount, User, UserFilter, UserUpdate};
use crate::errors::{ApiError, CoreError, StoreError};
use crate::lookup::Lookup;
use crate::tenant::Tenant;
use crate::types::{ObjectKey, Secret};
use async_trait::async_trait;
use std::sync::Arc;

/// Store holding Tenant records
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Fetch a tenant by namespace/name
    async fn get_tenant(&self, key: &ObjectKey) -> Lookup<Tenant, StoreError>;

    /// List tenants, optionally restricted to one namespace
    async fn list_tenants(&self, namespace: Option<&str>) -> Result<Vec<Tenant>, StoreError>;

    /// Persist the status of a tenant (status subresource only)
    async fn update_tenant_status(&self, tenant: &Tenant) -> Result<(), StoreError>;
}

/// Store holding key/value secrets
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, key: &ObjectKey) -> Lookup<Secret, StoreError>;

    /// Create a secret; fails with `AlreadyExists` if the key is taken
    async fn create_secret(&self, secret: Secret) -> Result<(), StoreError>;
}

/// Remote tenant-account API of the control plane
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn show_account(&self, account_id: u64) -> Lookup<Account, ApiError>;

    async fn create_account(&self, account: &NewAccount) -> Result<Account, ApiError>;

    async fn update_account(&self, account_id: u64, update: &AccountUpdate) -> Result<Account, ApiError>;

    async fn list_users(&self, account_id: u64, filter: &UserFilter) -> Result<Vec<User>, ApiError>;

    async fn read_user(&self, account_id: u64, user_id: u64) -> Result<User, ApiError>;

    async fn update_user(&self, account_id: u64, user_id: u64, update: &UserUpdate) -> Result<User, ApiError>;

    async fn activate_user(&self, account_id: u64, user_id: u64) -> Result<(), ApiError>;

    async fn list_applications(&self, account_id: u64) -> Result<Vec<Application>, ApiError>;
}

/// Builds the control-plane client a given tenant should be reconciled with
#[async_trait]
pub trait AccountApiFactory: Send + Sync {
    async fn account_api(&self, tenant: &Tenant) -> Result<Arc<dyn AccountApi>, CoreError>;
}

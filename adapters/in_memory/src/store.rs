//! In-memory TenantStore and SecretStore

use crate::InMemoryConfig;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tenant_operator_core::prelude::*;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

/// Internal storage
#[derive(Debug, Default)]
struct MemoryStore {
    tenants: HashMap<ObjectKey, Tenant>,
    secrets: HashMap<ObjectKey, Secret>,
    status_updates: usize,
    secret_creates: usize,
    read_only: bool,
    read_failure: Option<StoreError>,
}

impl MemoryStore {
    fn assign_identity(meta: &mut ObjectMeta) {
        if meta.uid.is_empty() {
            meta.uid = Uuid::new_v4().to_string();
        }
        if meta.creation_timestamp.is_none() {
            meta.creation_timestamp = Some(Utc::now());
        }
    }

    /// Fold `string_data` into `data` the way an API server does on write
    fn normalize_secret(mut secret: Secret) -> Secret {
        let string_data = std::mem::take(&mut secret.string_data);
        for (key, value) in string_data {
            secret.data.insert(key, value.into_bytes());
        }
        Self::assign_identity(&mut secret.metadata);
        secret
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Backend("store is read-only".to_string()));
        }
        Ok(())
    }
}

/// In-memory store for Tenant records and secrets
#[derive(Clone)]
pub struct InMemoryStore {
    store: Arc<RwLock<MemoryStore>>,
    config: InMemoryConfig,
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::new_with_config(InMemoryConfig::default())
    }

    /// Create a new in-memory store with configuration
    pub fn new_with_config(config: InMemoryConfig) -> Self {
        info!("Creating in-memory store with config: {:?}", config);
        Self {
            store: Arc::new(RwLock::new(MemoryStore::default())),
            config,
        }
    }

    /// Insert or replace a tenant record, assigning a uid when missing.
    /// Returns the stored record.
    pub async fn insert_tenant(&self, mut tenant: Tenant) -> Tenant {
        MemoryStore::assign_identity(&mut tenant.metadata);
        let mut store = self.store.write().await;
        store.tenants.insert(tenant.key(), tenant.clone());
        tenant
    }

    /// Insert or replace a secret without counting it as a create
    pub async fn insert_secret(&self, secret: Secret) {
        let secret = MemoryStore::normalize_secret(secret);
        let mut store = self.store.write().await;
        store.secrets.insert(secret.metadata.key(), secret);
    }

    /// Make every write fail with a backend error
    pub async fn set_read_only(&self, read_only: bool) {
        self.store.write().await.read_only = read_only;
    }

    /// Number of status updates issued so far
    pub async fn status_update_count(&self) -> usize {
        self.store.read().await.status_updates
    }

    /// Number of secrets created through `create_secret` so far
    pub async fn secret_create_count(&self) -> usize {
        self.store.read().await.secret_creates
    }

    /// Make every secret read fail with `failure` until reset with `None`
    pub async fn set_read_failure(&self, failure: Option<StoreError>) {
        self.store.write().await.read_failure = failure;
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantStore for InMemoryStore {
    async fn get_tenant(&self, key: &ObjectKey) -> Lookup<Tenant, StoreError> {
        let store = self.store.read().await;
        match store.tenants.get(key) {
            Some(tenant) => Lookup::Found(tenant.clone()),
            None => Lookup::NotFound,
        }
    }

    async fn list_tenants(&self, namespace: Option<&str>) -> Result<Vec<Tenant>, StoreError> {
        let store = self.store.read().await;
        let mut tenants: Vec<Tenant> = store
            .tenants
            .values()
            .filter(|t| namespace.map_or(true, |ns| t.metadata.namespace == ns))
            .cloned()
            .collect();
        tenants.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(tenants)
    }

    async fn update_tenant_status(&self, tenant: &Tenant) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        store.check_writable()?;

        let key = tenant.key();
        let stored = store
            .tenants
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        // Status subresource: only the status is taken from the caller
        stored.status = tenant.status;
        store.status_updates += 1;

        if self.config.verbose {
            debug!("Updated status of tenant {}: {:?}", key, tenant.status);
        }
        Ok(())
    }
}

#[async_trait]
impl SecretStore for InMemoryStore {
    async fn get_secret(&self, key: &ObjectKey) -> Lookup<Secret, StoreError> {
        let store = self.store.read().await;
        if let Some(err) = &store.read_failure {
            return Lookup::Failed(err.clone());
        }
        match store.secrets.get(key) {
            Some(secret) => Lookup::Found(secret.clone()),
            None => Lookup::NotFound,
        }
    }

    async fn create_secret(&self, secret: Secret) -> Result<(), StoreError> {
        let mut store = self.store.write().await;
        store.check_writable()?;

        let key = secret.metadata.key();
        if store.secrets.contains_key(&key) {
            return Err(StoreError::AlreadyExists(key));
        }

        store.secrets.insert(key.clone(), MemoryStore::normalize_secret(secret));
        store.secret_creates += 1;

        if self.config.verbose {
            debug!("Created secret {}", key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(namespace: &str, name: &str) -> Tenant {
        Tenant::new(
            ObjectMeta::new(namespace, name),
            TenantSpec {
                username: "admin".to_string(),
                email: "admin@example.com".to_string(),
                organization_name: "Example".to_string(),
                system_master_url: "https://master.example.com".to_string(),
                tenant_secret_ref: SecretRef {
                    name: format!("{}-secret", name),
                    namespace: namespace.to_string(),
                },
                password_credentials_ref: LocalSecretRef { name: "password".to_string() },
                master_credentials_ref: LocalSecretRef { name: "master".to_string() },
            },
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_uid() {
        let store = InMemoryStore::new();
        let stored = store.insert_tenant(tenant("ns", "a")).await;
        assert!(!stored.metadata.uid.is_empty());
        assert!(stored.metadata.creation_timestamp.is_some());
    }

    #[tokio::test]
    async fn test_status_update_only_touches_status() {
        let store = InMemoryStore::new();
        store.insert_tenant(tenant("ns", "a")).await;

        let mut changed = tenant("ns", "a").with_status(TenantStatus::new(4, 9));
        changed.spec.organization_name = "Other".to_string();
        store.update_tenant_status(&changed).await.unwrap();

        let Lookup::Found(stored) = store.get_tenant(&ObjectKey::new("ns", "a")).await else {
            panic!("tenant missing");
        };
        assert_eq!(stored.status, TenantStatus::new(4, 9));
        assert_eq!(stored.spec.organization_name, "Example");
        assert_eq!(store.status_update_count().await, 1);
    }

    #[tokio::test]
    async fn test_status_update_of_missing_tenant() {
        let store = InMemoryStore::new();
        let err = store.update_tenant_status(&tenant("ns", "ghost")).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_filters_by_namespace() {
        let store = InMemoryStore::new();
        store.insert_tenant(tenant("a", "one")).await;
        store.insert_tenant(tenant("b", "two")).await;
        store.insert_tenant(tenant("a", "three")).await;

        assert_eq!(store.list_tenants(None).await.unwrap().len(), 3);
        let in_a = store.list_tenants(Some("a")).await.unwrap();
        let names: Vec<_> = in_a.iter().map(|t| t.metadata.name.as_str()).collect();
        assert_eq!(names, vec!["one", "three"]);
    }

    #[tokio::test]
    async fn test_secret_create_is_exclusive() {
        let store = InMemoryStore::new();
        let secret = Secret::new(ObjectMeta::new("ns", "creds")).with_string_data("token", "abc");

        store.create_secret(secret.clone()).await.unwrap();
        let err = store.create_secret(secret).await.unwrap_err();
        assert_eq!(err, StoreError::AlreadyExists(ObjectKey::new("ns", "creds")));

        let Lookup::Found(stored) = store.get_secret(&ObjectKey::new("ns", "creds")).await else {
            panic!("secret missing");
        };
        assert!(stored.string_data.is_empty());
        assert_eq!(stored.data.get("token"), Some(&b"abc".to_vec()));
        assert_eq!(store.secret_create_count().await, 1);
    }

    #[tokio::test]
    async fn test_read_only_rejects_writes() {
        let store = InMemoryStore::new();
        store.set_read_only(true).await;
        let secret = Secret::new(ObjectMeta::new("ns", "creds"));
        assert!(matches!(store.create_secret(secret).await, Err(StoreError::Backend(_))));
    }
}

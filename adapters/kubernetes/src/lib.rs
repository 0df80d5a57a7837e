//! Kubernetes adapter: Tenant custom resources and core/v1 Secrets as the
//! operator's TenantStore and SecretStore

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret as K8sSecret;
use kube::api::{Api, ListParams, Patch, PatchParams, PostParams};
use kube::Client;
use tenant_operator_core::prelude::*;
use tracing::{debug, info};

mod config;
mod convert;
pub mod crd;

pub use config::KubernetesConfig;
pub use crd::TenantResource;

/// Stores backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
    config: KubernetesConfig,
}

impl KubeStore {
    /// Connect using the ambient kubeconfig or in-cluster service account
    pub async fn new(config: KubernetesConfig) -> Result<Self, StoreError> {
        info!("Connecting to Kubernetes API server");
        let client = Client::try_default()
            .await
            .map_err(|e| StoreError::ConnectionFailed(format!("Kubernetes client setup failed: {}", e)))?;
        Ok(Self::from_client(client, config))
    }

    /// Wrap an existing client
    pub fn from_client(client: Client, config: KubernetesConfig) -> Self {
        Self { client, config }
    }

    fn tenants(&self, namespace: &str) -> Api<TenantResource> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn secrets(&self, namespace: &str) -> Api<K8sSecret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Map a kube error onto the store taxonomy
fn store_error(err: kube::Error, key: &ObjectKey) -> StoreError {
    match err {
        kube::Error::Api(response) if response.code == 404 => StoreError::NotFound(key.clone()),
        kube::Error::Api(response) if response.code == 409 => StoreError::AlreadyExists(key.clone()),
        kube::Error::Api(response) => StoreError::Backend(format!(
            "{} ({}): {}",
            response.reason, response.code, response.message
        )),
        kube::Error::SerdeError(e) => StoreError::Serialization(e.to_string()),
        other => StoreError::ConnectionFailed(other.to_string()),
    }
}

#[async_trait]
impl TenantStore for KubeStore {
    async fn get_tenant(&self, key: &ObjectKey) -> Lookup<Tenant, StoreError> {
        debug!("Fetching tenant {}", key);
        let result = self
            .tenants(&key.namespace)
            .get(&key.name)
            .await
            .map(convert::tenant_from_resource)
            .map_err(|e| store_error(e, key));
        Lookup::from_result(result, StoreError::is_not_found)
    }

    async fn list_tenants(&self, namespace: Option<&str>) -> Result<Vec<Tenant>, StoreError> {
        let api: Api<TenantResource> = match namespace {
            Some(ns) => self.tenants(ns),
            None => Api::all(self.client.clone()),
        };
        let key = ObjectKey::new(namespace.unwrap_or("*"), "*");

        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| store_error(e, &key))?;
        debug!("Listed {} tenants", list.items.len());
        Ok(list.items.into_iter().map(convert::tenant_from_resource).collect())
    }

    async fn update_tenant_status(&self, tenant: &Tenant) -> Result<(), StoreError> {
        let key = tenant.key();
        let params = PatchParams {
            field_manager: Some(self.config.field_manager.clone()),
            ..Default::default()
        };
        let patch = convert::status_patch(&tenant.status);

        self.tenants(&key.namespace)
            .patch_status(&key.name, &params, &Patch::Merge(&patch))
            .await
            .map_err(|e| store_error(e, &key))?;
        debug!("Patched status of tenant {}", key);
        Ok(())
    }
}

#[async_trait]
impl SecretStore for KubeStore {
    async fn get_secret(&self, key: &ObjectKey) -> Lookup<Secret, StoreError> {
        debug!("Fetching secret {}", key);
        let result = self
            .secrets(&key.namespace)
            .get(&key.name)
            .await
            .map(convert::secret_from_k8s)
            .map_err(|e| store_error(e, key));
        Lookup::from_result(result, StoreError::is_not_found)
    }

    async fn create_secret(&self, secret: Secret) -> Result<(), StoreError> {
        let key = secret.metadata.key();
        let object = convert::secret_to_k8s(&secret);

        self.secrets(&key.namespace)
            .create(&PostParams::default(), &object)
            .await
            .map_err(|e| store_error(e, &key))?;
        info!("Created secret {}", key);
        Ok(())
    }
}

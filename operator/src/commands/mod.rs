//! Command implementations

pub mod crd;
pub mod reconcile;
pub mod run;
pub mod status;

use crate::config::OperatorConfig;
use crate::controller::Controller;
use crate::factory::PortaApiFactory;
use std::sync::Arc;
use tenant_operator_adapter_kubernetes::{KubeStore, KubernetesConfig};
use tenant_operator_core::errors::StoreError;

/// Connect to the cluster
pub async fn kube_store(config: &OperatorConfig) -> Result<Arc<KubeStore>, StoreError> {
    let kube_config = KubernetesConfig::default().with_field_manager(config.field_manager.clone());
    Ok(Arc::new(KubeStore::new(kube_config).await?))
}

/// Wire a controller to the cluster and porta
pub fn controller(store: Arc<KubeStore>, config: &OperatorConfig) -> Controller {
    let factory = PortaApiFactory::new(store.clone(), config.porta.clone());
    Controller::new(store.clone(), store, Arc::new(factory))
        .with_options(config.reconciler_options())
        .with_namespace(config.namespace.clone())
}

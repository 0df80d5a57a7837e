//! Drives reconciliation over the stored Tenants

use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tenant_operator_core::prelude::*;
use tracing::{error, info, warn};

/// Counts from one pass over all Tenants
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub total: usize,
    /// Runs that converged without error
    pub succeeded: usize,
    /// Successful runs that changed something
    pub changed: usize,
    /// Tenants deleted between listing and reconciling
    pub skipped: usize,
    pub failed: usize,
}

/// Reconciles Tenants one at a time against their control planes
pub struct Controller {
    tenants: Arc<dyn TenantStore>,
    secrets: Arc<dyn SecretStore>,
    apis: Arc<dyn AccountApiFactory>,
    options: ReconcilerOptions,
    namespace: Option<String>,
}

impl Controller {
    pub fn new(
        tenants: Arc<dyn TenantStore>,
        secrets: Arc<dyn SecretStore>,
        apis: Arc<dyn AccountApiFactory>,
    ) -> Self {
        Self {
            tenants,
            secrets,
            apis,
            options: ReconcilerOptions::default(),
            namespace: None,
        }
    }

    pub fn with_options(mut self, options: ReconcilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Restrict passes to one namespace
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Reconcile the Tenant stored under `key`.
    ///
    /// Returns `Ok(None)` when the Tenant no longer exists.
    pub async fn reconcile(&self, key: &ObjectKey) -> Result<Option<ReconcileReport>, ReconcileError> {
        let mut tenant = match self.tenants.get_tenant(key).await {
            Lookup::Found(tenant) => tenant,
            Lookup::NotFound => {
                info!("Tenant {} not found, it may have been deleted", key);
                return Ok(None);
            }
            Lookup::Failed(err) => return Err(ReconcileError::new(key.clone(), Stage::Fetch, err)),
        };

        let api = self
            .apis
            .account_api(&tenant)
            .await
            .map_err(|e| ReconcileError::new(key.clone(), Stage::Connect, e))?;

        TenantReconciler::new(self.tenants.clone(), self.secrets.clone(), api)
            .with_options(self.options.clone())
            .run(&mut tenant)
            .await
            .map(Some)
    }

    /// Reconcile every Tenant once. A failing Tenant does not stop the pass.
    pub async fn run_pass(&self) -> Result<PassSummary, StoreError> {
        let tenants = self.tenants.list_tenants(self.namespace.as_deref()).await?;
        let mut summary = PassSummary {
            total: tenants.len(),
            ..Default::default()
        };

        for tenant in tenants {
            match self.reconcile(&tenant.key()).await {
                Ok(Some(report)) => {
                    summary.succeeded += 1;
                    if !report.is_noop() {
                        summary.changed += 1;
                    }
                }
                Ok(None) => summary.skipped += 1,
                Err(err) => {
                    error!("{}", err);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Run passes every `interval` until `shutdown` resolves.
    ///
    /// A pass in progress finishes before shutdown is observed.
    pub async fn run<F>(&self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            "Reconciling Tenants in {} every {:?}",
            self.namespace.as_deref().unwrap_or("all namespaces"),
            interval
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping controller");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_pass().await {
                        Ok(summary) if summary.failed > 0 => warn!(
                            "Pass finished: {} of {} tenants failed",
                            summary.failed, summary.total
                        ),
                        Ok(summary) => info!(
                            "Pass finished: {} tenants, {} changed",
                            summary.total, summary.changed
                        ),
                        Err(err) => error!("Failed to list tenants: {}", err),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_operator_adapter_in_memory::{InMemoryControlPlane, InMemoryStore};

    const NAMESPACE: &str = "tenants";

    /// Hands out the same simulated control plane for every Tenant
    struct StaticApiFactory {
        plane: Option<InMemoryControlPlane>,
    }

    #[async_trait]
    impl AccountApiFactory for StaticApiFactory {
        async fn account_api(&self, _tenant: &Tenant) -> Result<Arc<dyn AccountApi>, CoreError> {
            match &self.plane {
                Some(plane) => {
                    let api: Arc<dyn AccountApi> = Arc::new(plane.clone());
                    Ok(api)
                }
                None => Err(CoreError::Configuration("no control plane".to_string())),
            }
        }
    }

    fn spec(name: &str) -> TenantSpec {
        TenantSpec {
            username: "admin".to_string(),
            email: format!("admin@{}.test", name),
            organization_name: name.to_string(),
            system_master_url: "https://master.example.com".to_string(),
            tenant_secret_ref: SecretRef {
                name: format!("{}-credentials", name),
                namespace: NAMESPACE.to_string(),
            },
            password_credentials_ref: LocalSecretRef { name: "admin-password".to_string() },
            master_credentials_ref: LocalSecretRef { name: "system-seed".to_string() },
        }
    }

    async fn store_with_password() -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert_secret(
                Secret::new(ObjectMeta::new(NAMESPACE, "admin-password"))
                    .with_data(ADMIN_PASSWORD_SECRET_FIELD, b"s3cret".to_vec()),
            )
            .await;
        store
    }

    fn controller(store: &InMemoryStore, plane: Option<InMemoryControlPlane>) -> Controller {
        Controller::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(StaticApiFactory { plane }),
        )
    }

    #[tokio::test]
    async fn test_reconcile_deleted_tenant_is_skipped() {
        let store = store_with_password().await;
        let controller = controller(&store, Some(InMemoryControlPlane::new()));

        let result = controller.reconcile(&ObjectKey::new(NAMESPACE, "gone")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_reconcile_persists_status() {
        let store = store_with_password().await;
        let plane = InMemoryControlPlane::new();
        let tenant = store.insert_tenant(Tenant::new(ObjectMeta::new(NAMESPACE, "acme"), spec("acme"))).await;
        let controller = controller(&store, Some(plane.clone()));

        let report = controller.reconcile(&tenant.key()).await.unwrap().unwrap();
        assert_eq!(report.account, AccountAction::Created);
        assert_eq!(plane.account_count().await, 1);

        let stored = store.get_tenant(&tenant.key()).await.into_result().unwrap().unwrap();
        assert_eq!(stored.status, TenantStatus::new(report.account_id, report.admin_id));

        let second = controller.reconcile(&tenant.key()).await.unwrap().unwrap();
        assert!(second.is_noop());
    }

    #[tokio::test]
    async fn test_client_failure_reports_connect_stage() {
        let store = store_with_password().await;
        let tenant = store.insert_tenant(Tenant::new(ObjectMeta::new(NAMESPACE, "acme"), spec("acme"))).await;
        let controller = controller(&store, None);

        let err = controller.reconcile(&tenant.key()).await.unwrap_err();
        assert_eq!(err.stage, Stage::Connect);
        assert_eq!(err.tenant, tenant.key());
    }

    #[tokio::test]
    async fn test_pass_continues_past_failing_tenant() {
        let store = store_with_password().await;
        let plane = InMemoryControlPlane::new();
        store.insert_tenant(Tenant::new(ObjectMeta::new(NAMESPACE, "acme"), spec("acme"))).await;

        let mut broken = spec("globex");
        broken.password_credentials_ref = LocalSecretRef { name: "missing".to_string() };
        store.insert_tenant(Tenant::new(ObjectMeta::new(NAMESPACE, "globex"), broken)).await;

        let controller = controller(&store, Some(plane.clone()));
        let summary = controller.run_pass().await.unwrap();
        assert_eq!(
            summary,
            PassSummary {
                total: 2,
                succeeded: 1,
                changed: 1,
                skipped: 0,
                failed: 1,
            }
        );
        assert_eq!(plane.account_count().await, 1);
    }

    #[tokio::test]
    async fn test_pass_respects_namespace() {
        let store = store_with_password().await;
        store.insert_tenant(Tenant::new(ObjectMeta::new(NAMESPACE, "acme"), spec("acme"))).await;
        store.insert_tenant(Tenant::new(ObjectMeta::new("elsewhere", "initech"), spec("initech"))).await;

        let controller = controller(&store, Some(InMemoryControlPlane::new()))
            .with_namespace(Some("elsewhere".to_string()));
        let summary = controller.run_pass().await.unwrap();
        assert_eq!(summary.total, 1);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let store = store_with_password().await;
        let plane = InMemoryControlPlane::new();
        store.insert_tenant(Tenant::new(ObjectMeta::new(NAMESPACE, "acme"), spec("acme"))).await;
        let controller = controller(&store, Some(plane.clone()));

        controller
            .run(Duration::from_millis(10), tokio::time::sleep(Duration::from_millis(100)))
            .await;

        assert_eq!(plane.account_count().await, 1);
        assert_eq!(store.status_update_count().await, 1);
    }
}

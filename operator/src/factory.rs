//! Builds porta clients from a Tenant's master credentials

use crate::config::PortaSettings;
use async_trait::async_trait;
use std::sync::Arc;
use tenant_operator_connector_porta::{PortaConfig, PortaConnector};
use tenant_operator_core::credentials::read_secret_field;
use tenant_operator_core::prelude::*;
use tracing::debug;

/// Creates a [`PortaConnector`] per Tenant, authenticated with the
/// `MASTER_ACCESS_TOKEN` found in the Tenant's master credentials secret
pub struct PortaApiFactory {
    secrets: Arc<dyn SecretStore>,
    settings: PortaSettings,
}

impl PortaApiFactory {
    pub fn new(secrets: Arc<dyn SecretStore>, settings: PortaSettings) -> Self {
        Self { secrets, settings }
    }
}

#[async_trait]
impl AccountApiFactory for PortaApiFactory {
    async fn account_api(&self, tenant: &Tenant) -> Result<Arc<dyn AccountApi>, CoreError> {
        let secret_key = tenant.master_credentials_key();
        let access_token =
            read_secret_field(self.secrets.as_ref(), &secret_key, MASTER_ACCESS_TOKEN_SECRET_FIELD).await?;

        debug!(
            "Building porta client for {} at {}",
            tenant.key(),
            tenant.spec.system_master_url
        );
        let config = PortaConfig::new(tenant.spec.system_master_url.clone(), access_token)
            .with_timeout(self.settings.timeout_ms)
            .with_accept_invalid_certs(self.settings.accept_invalid_certs);

        let api: Arc<dyn AccountApi> = Arc::new(PortaConnector::new(config)?);
        Ok(api)
    }
}

//! Listing recorded Tenant status

use super::kube_store;
use crate::config::OperatorConfig;
use crate::errors::OperatorResult;
use crate::output;
use tenant_operator_core::traits::TenantStore;

/// Handle the status command
pub async fn handle_status_command(config: &OperatorConfig) -> OperatorResult<()> {
    let store = kube_store(config).await?;
    let tenants = store.list_tenants(config.namespace.as_deref()).await?;
    output::display_tenants(&tenants, &config.default_format)
}

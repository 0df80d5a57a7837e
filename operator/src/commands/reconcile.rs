//! One-shot reconciliation of a single Tenant

use super::{controller, kube_store};
use crate::config::OperatorConfig;
use crate::errors::OperatorResult;
use crate::output;
use tenant_operator_core::types::ObjectKey;
use tracing::info;

/// Handle the reconcile command
pub async fn handle_reconcile_command(key: &ObjectKey, config: &OperatorConfig) -> OperatorResult<()> {
    let store = kube_store(config).await?;
    let controller = controller(store, config);

    info!("Reconciling tenant {}", key);
    let report = controller.reconcile(key).await?;
    output::display_report(key, report.as_ref(), &config.default_format)
}

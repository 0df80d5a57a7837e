//! Printing the CustomResourceDefinition

use crate::errors::{OperatorError, OperatorResult};
use kube::CustomResourceExt;
use tenant_operator_adapter_kubernetes::TenantResource;

/// Render the Tenant CRD as JSON, suitable for `kubectl apply -f -`
pub fn render_crd() -> OperatorResult<String> {
    serde_json::to_string_pretty(&TenantResource::crd())
        .map_err(|e| OperatorError::Output(format!("Failed to serialize CRD: {}", e)))
}

/// Handle the crd command
pub fn handle_crd_command() -> OperatorResult<()> {
    println!("{}", render_crd()?);
    Ok(())
}

//! Tenant custom resource definition

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired state of a tenant account on the 3scale control plane
#[derive(CustomResource, Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "capabilities.3scale.net",
    version = "v1alpha1",
    kind = "Tenant",
    root = "TenantResource",
    namespaced,
    status = "TenantResourceStatus",
    printcolumn = r#"{"name":"Tenant ID", "type":"integer", "jsonPath":".status.tenantId"}"#,
    printcolumn = r#"{"name":"Admin ID", "type":"integer", "jsonPath":".status.adminId"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct TenantResourceSpec {
    pub username: String,
    pub email: String,
    pub organization_name: String,
    pub system_master_url: String,
    pub tenant_secret_ref: NamespacedSecretReference,
    pub password_credentials_ref: LocalSecretReference,
    pub master_credentials_ref: LocalSecretReference,
}

/// Secret in an explicit namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NamespacedSecretReference {
    pub name: String,
    pub namespace: String,
}

/// Secret in the Tenant's namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LocalSecretReference {
    pub name: String,
}

/// Observed remote identifiers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantResourceStatus {
    #[serde(default)]
    pub tenant_id: u64,
    #[serde(default)]
    pub admin_id: u64,
}

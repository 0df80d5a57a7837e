//! The Tenant desired-state record

use crate::types::{ObjectKey, ObjectMeta, OwnerReference};
use serde::{Deserialize, Serialize};

/// API group/version of the Tenant resource
pub const TENANT_API_VERSION: &str = "capabilities.3scale.net/v1alpha1";

/// Kind of the Tenant resource
pub const TENANT_KIND: &str = "Tenant";

/// Field of the password secret holding the admin password
pub const ADMIN_PASSWORD_SECRET_FIELD: &str = "admin_password";

/// Field of the credential secret holding the tenant access token
pub const PROVIDER_KEY_SECRET_FIELD: &str = "token";

/// Field of the credential secret holding the admin portal URL
pub const ADMIN_URL_SECRET_FIELD: &str = "adminURL";

/// Field of the master credentials secret holding the master access token
pub const MASTER_ACCESS_TOKEN_SECRET_FIELD: &str = "MASTER_ACCESS_TOKEN";

/// Label put on every secret the operator creates
pub const OPERATOR_LABEL: (&str, &str) = ("app", "3scale-operator");

/// Reference to a secret in an explicit namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    pub name: String,
    pub namespace: String,
}

impl SecretRef {
    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.namespace.clone(), self.name.clone())
    }
}

/// Reference to a secret in the tenant's own namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSecretRef {
    pub name: String,
}

/// User-declared tenant configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSpec {
    pub username: String,
    pub email: String,
    pub organization_name: String,
    /// Base URL of the control plane's master portal
    pub system_master_url: String,
    /// Where the access-credential secret is written
    pub tenant_secret_ref: SecretRef,
    pub password_credentials_ref: LocalSecretRef,
    pub master_credentials_ref: LocalSecretRef,
}

/// Observed remote identifiers. Zero means "not known yet".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantStatus {
    #[serde(rename = "tenantId", default)]
    pub account_id: u64,
    #[serde(default)]
    pub admin_id: u64,
}

impl TenantStatus {
    pub fn new(account_id: u64, admin_id: u64) -> Self {
        Self { account_id, admin_id }
    }
}

/// A Tenant record: metadata, spec and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub metadata: ObjectMeta,
    pub spec: TenantSpec,
    #[serde(default)]
    pub status: TenantStatus,
}

impl Tenant {
    /// Create a tenant record with an empty status
    pub fn new(metadata: ObjectMeta, spec: TenantSpec) -> Self {
        Self {
            metadata,
            spec,
            status: TenantStatus::default(),
        }
    }

    /// Set the status
    pub fn with_status(mut self, status: TenantStatus) -> Self {
        self.status = status;
        self
    }

    pub fn key(&self) -> ObjectKey {
        self.metadata.key()
    }

    /// Key of the admin password secret
    pub fn password_secret_key(&self) -> ObjectKey {
        ObjectKey::new(
            self.metadata.namespace.clone(),
            self.spec.password_credentials_ref.name.clone(),
        )
    }

    /// Key of the master credentials secret
    pub fn master_credentials_key(&self) -> ObjectKey {
        ObjectKey::new(
            self.metadata.namespace.clone(),
            self.spec.master_credentials_ref.name.clone(),
        )
    }

    /// Owner reference pointing back at this record
    pub fn as_owner(&self) -> OwnerReference {
        OwnerReference {
            api_version: TENANT_API_VERSION.to_string(),
            kind: TENANT_KIND.to_string(),
            name: self.metadata.name.clone(),
            uid: self.metadata.uid.clone(),
            controller: true,
            block_owner_deletion: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec() -> TenantSpec {
        TenantSpec {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            organization_name: "Example".to_string(),
            system_master_url: "https://master.example.com".to_string(),
            tenant_secret_ref: SecretRef {
                name: "example-tenant".to_string(),
                namespace: "operators".to_string(),
            },
            password_credentials_ref: LocalSecretRef { name: "example-password".to_string() },
            master_credentials_ref: LocalSecretRef { name: "system-seed".to_string() },
        }
    }

    #[test]
    fn test_status_wire_names() {
        let status = TenantStatus::new(3, 7);
        let value = serde_json::to_value(status).unwrap();
        assert_eq!(value, json!({"tenantId": 3, "adminId": 7}));
    }

    #[test]
    fn test_secret_keys_use_tenant_namespace() {
        let tenant = Tenant::new(ObjectMeta::new("tenants", "example"), spec());
        assert_eq!(tenant.password_secret_key(), ObjectKey::new("tenants", "example-password"));
        assert_eq!(tenant.master_credentials_key(), ObjectKey::new("tenants", "system-seed"));
        assert_eq!(tenant.spec.tenant_secret_ref.key(), ObjectKey::new("operators", "example-tenant"));
    }

    #[test]
    fn test_as_owner() {
        let tenant = Tenant::new(ObjectMeta::new("tenants", "example").with_uid("abc-123"), spec());
        let owner = tenant.as_owner();
        assert_eq!(owner.kind, "Tenant");
        assert_eq!(owner.uid, "abc-123");
        assert!(owner.controller);
        assert!(owner.block_owner_deletion);
    }
}

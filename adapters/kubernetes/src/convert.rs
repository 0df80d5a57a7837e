//! Conversions between Kubernetes objects and core types

use crate::crd::{TenantResource, TenantResourceStatus};
use k8s_openapi::api::core::v1::Secret as K8sSecret;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta as K8sObjectMeta, OwnerReference as K8sOwnerReference};
use k8s_openapi::ByteString;
use std::collections::BTreeMap;
use tenant_operator_core::prelude::*;

fn meta_from_k8s(meta: K8sObjectMeta) -> ObjectMeta {
    ObjectMeta {
        namespace: meta.namespace.unwrap_or_default(),
        name: meta.name.unwrap_or_default(),
        uid: meta.uid.unwrap_or_default(),
        labels: meta.labels.unwrap_or_default(),
        owner_references: meta
            .owner_references
            .unwrap_or_default()
            .into_iter()
            .map(|owner| OwnerReference {
                api_version: owner.api_version,
                kind: owner.kind,
                name: owner.name,
                uid: owner.uid,
                controller: owner.controller.unwrap_or(false),
                block_owner_deletion: owner.block_owner_deletion.unwrap_or(false),
            })
            .collect(),
        creation_timestamp: meta.creation_timestamp.map(|time| time.0),
    }
}

fn meta_to_k8s(meta: &ObjectMeta) -> K8sObjectMeta {
    let owner_references: Vec<K8sOwnerReference> = meta
        .owner_references
        .iter()
        .map(|owner| K8sOwnerReference {
            api_version: owner.api_version.clone(),
            kind: owner.kind.clone(),
            name: owner.name.clone(),
            uid: owner.uid.clone(),
            controller: Some(owner.controller),
            block_owner_deletion: Some(owner.block_owner_deletion),
        })
        .collect();

    K8sObjectMeta {
        namespace: Some(meta.namespace.clone()),
        name: Some(meta.name.clone()),
        labels: (!meta.labels.is_empty()).then(|| meta.labels.clone()),
        owner_references: (!owner_references.is_empty()).then_some(owner_references),
        ..Default::default()
    }
}

/// Build a core Tenant from the custom resource
pub fn tenant_from_resource(resource: TenantResource) -> Tenant {
    let spec = resource.spec;
    let status = resource.status.unwrap_or_default();

    Tenant {
        metadata: meta_from_k8s(resource.metadata),
        spec: TenantSpec {
            username: spec.username,
            email: spec.email,
            organization_name: spec.organization_name,
            system_master_url: spec.system_master_url,
            tenant_secret_ref: SecretRef {
                name: spec.tenant_secret_ref.name,
                namespace: spec.tenant_secret_ref.namespace,
            },
            password_credentials_ref: LocalSecretRef {
                name: spec.password_credentials_ref.name,
            },
            master_credentials_ref: LocalSecretRef {
                name: spec.master_credentials_ref.name,
            },
        },
        status: TenantStatus::new(status.tenant_id, status.admin_id),
    }
}

/// Merge patch replacing the status subresource
pub fn status_patch(status: &TenantStatus) -> serde_json::Value {
    let status = TenantResourceStatus {
        tenant_id: status.account_id,
        admin_id: status.admin_id,
    };
    serde_json::json!({ "status": status })
}

/// Build a core Secret from a Kubernetes secret
pub fn secret_from_k8s(secret: K8sSecret) -> Secret {
    Secret {
        metadata: meta_from_k8s(secret.metadata),
        data: secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect(),
        string_data: secret.string_data.unwrap_or_default(),
        secret_type: secret.type_.unwrap_or_else(|| SECRET_TYPE_OPAQUE.to_string()),
    }
}

/// Build a Kubernetes secret from a core Secret
pub fn secret_to_k8s(secret: &Secret) -> K8sSecret {
    let data: BTreeMap<String, ByteString> = secret
        .data
        .iter()
        .map(|(key, value)| (key.clone(), ByteString(value.clone())))
        .collect();

    K8sSecret {
        metadata: meta_to_k8s(&secret.metadata),
        data: (!data.is_empty()).then_some(data),
        string_data: (!secret.string_data.is_empty()).then(|| secret.string_data.clone()),
        type_: Some(secret.secret_type.clone()),
        ..Default::default()
    }
}

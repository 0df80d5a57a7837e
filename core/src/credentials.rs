//! Reading individual fields out of stored secrets

use crate::errors::{CoreError, CoreResult, StoreError};
use crate::lookup::Lookup;
use crate::traits::SecretStore;
use crate::types::ObjectKey;

/// Read a required string field from a secret.
///
/// A missing secret surfaces as `StoreError::NotFound`; a missing or
/// non-UTF-8 field as the matching precondition error.
pub async fn read_secret_field(
    secrets: &dyn SecretStore,
    key: &ObjectKey,
    field: &str,
) -> CoreResult<String> {
    let secret = match secrets.get_secret(key).await {
        Lookup::Found(secret) => secret,
        Lookup::NotFound => return Err(StoreError::NotFound(key.clone()).into()),
        Lookup::Failed(err) => return Err(err.into()),
    };

    match secret.field(field) {
        Some(Ok(value)) => Ok(value),
        Some(Err(_)) => Err(CoreError::InvalidSecretField {
            secret: key.clone(),
            field: field.to_string(),
        }),
        None => Err(CoreError::MissingSecretField {
            secret: key.clone(),
            field: field.to_string(),
        }),
    }
}

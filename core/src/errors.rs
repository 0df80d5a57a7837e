//! Error types for tenant reconciliation

use crate::types::ObjectKey;
use thiserror::Error;

/// Main error type for core operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Control plane error: {0}")]
    Api(#[from] ApiError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Secret {secret} has no field '{field}'")]
    MissingSecretField { secret: ObjectKey, field: String },

    #[error("Secret {secret} field '{field}' is not valid UTF-8")]
    InvalidSecretField { secret: ObjectKey, field: String },

    #[error("Invalid admin domain '{domain}': {reason}")]
    InvalidAdminDomain { domain: String, reason: String },

    #[error(
        "Unexpected application list for account {account_id}: \
         expected exactly 1, found {count}"
    )]
    UnexpectedApplicationCount { account_id: u64, count: usize },

    #[error(
        "Admin user not found and should be available. \
         Account: {account_id}, username: {username}, email: {email}"
    )]
    AdminUserNotFound {
        account_id: u64,
        username: String,
        email: String,
    },

    #[error("Account {account_id} recorded in status no longer exists")]
    StaleAccountId { account_id: u64 },

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Errors returned by the remote control-plane API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ResponseParse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Errors returned by the local record and secret stores
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Object not found: {0}")]
    NotFound(ObjectKey),

    #[error("Object already exists: {0}")]
    AlreadyExists(ObjectKey),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// The reconciliation stage an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Loading the Tenant record
    Fetch,
    /// Building the control-plane client
    Connect,
    Account,
    Admin,
    CredentialSecret,
    Status,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Fetch => write!(f, "fetch"),
            Stage::Connect => write!(f, "connect"),
            Stage::Account => write!(f, "account"),
            Stage::Admin => write!(f, "admin user"),
            Stage::CredentialSecret => write!(f, "credential secret"),
            Stage::Status => write!(f, "status"),
        }
    }
}

/// Failure of a whole reconciliation run
#[derive(Error, Debug)]
#[error("Tenant {tenant}: {stage} stage failed: {source}")]
pub struct ReconcileError {
    pub tenant: ObjectKey,
    pub stage: Stage,
    #[source]
    pub source: CoreError,
}

impl ReconcileError {
    pub fn new(tenant: ObjectKey, stage: Stage, source: impl Into<CoreError>) -> Self {
        Self {
            tenant,
            stage,
            source: source.into(),
        }
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;

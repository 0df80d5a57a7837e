//! Errors surfaced by operator commands

use tenant_operator_core::errors::{CoreError, ReconcileError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperatorError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Output error: {0}")]
    Output(String),

    /// Some tenants of a pass failed; each failure was already logged
    #[error("{failed} of {total} tenants failed to reconcile")]
    PassFailed { failed: usize, total: usize },
}

pub type OperatorResult<T> = Result<T, OperatorError>;

//! porta API wire envelopes

use serde::Deserialize;
use tenant_operator_core::account::{Account, Application, User};

/// `{"account": {...}}`
#[derive(Debug, Deserialize)]
pub struct AccountEnvelope {
    pub account: Account,
}

/// Response of the signup endpoint
#[derive(Debug, Deserialize)]
pub struct SignupEnvelope {
    pub signup: Signup,
}

#[derive(Debug, Deserialize)]
pub struct Signup {
    pub account: Account,
}

/// `{"user": {...}}`
#[derive(Debug, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// `{"users": [{"user": {...}}, ...]}`
#[derive(Debug, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<UserEnvelope>,
}

/// `{"application": {...}}`
#[derive(Debug, Deserialize)]
pub struct ApplicationEnvelope {
    pub application: Application,
}

/// `{"applications": [{"application": {...}}, ...]}`
#[derive(Debug, Deserialize)]
pub struct ApplicationList {
    #[serde(default)]
    pub applications: Vec<ApplicationEnvelope>,
}

/// Error body returned by the API
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub errors: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Best human-readable message of the body
    pub fn message(&self) -> Option<String> {
        self.error
            .clone()
            .or_else(|| self.errors.as_ref().map(|errors| errors.to_string()))
    }
}

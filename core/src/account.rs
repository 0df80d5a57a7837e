//! Remote control-plane entities and request parameters

use serde::{Deserialize, Serialize};

/// A tenant account on the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub support_email: String,
    /// Bare admin portal domain, e.g. `example-admin.3scale.net`
    #[serde(default)]
    pub admin_domain: String,
    #[serde(default)]
    pub state: String,
}

/// Activation state of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserState {
    Pending,
    Active,
    Suspended,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for UserState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserState::Pending => write!(f, "pending"),
            UserState::Active => write!(f, "active"),
            UserState::Suspended => write!(f, "suspended"),
            UserState::Unknown => write!(f, "unknown"),
        }
    }
}

/// A user belonging to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub state: UserState,
    #[serde(default)]
    pub role: String,
    pub username: String,
    pub email: String,
}

impl User {
    pub fn is_pending(&self) -> bool {
        self.state == UserState::Pending
    }
}

/// An application registered on an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    /// Opaque API key of the application
    #[serde(default)]
    pub user_key: String,
}

/// Parameters for creating an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    pub org_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Mutable account attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountUpdate {
    pub org_name: String,
    pub support_email: String,
}

/// Mutable user attributes, always sent together
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    pub username: String,
    pub email: String,
}

/// Role of an account administrator
pub const ADMIN_ROLE: &str = "admin";

/// Filter for listing users
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl UserFilter {
    /// Administrators in any state
    pub fn admins() -> Self {
        Self {
            role: Some(ADMIN_ROLE.to_string()),
            state: None,
        }
    }
}

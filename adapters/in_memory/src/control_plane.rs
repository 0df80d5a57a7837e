//! Simulated control plane implementing AccountApi.
//!
//! Behaves like the real master API closely enough for reconciliation tests:
//! creating an account provisions a pending admin user and one application,
//! and every call is appended to a journal so tests can assert on ordering.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tenant_operator_core::prelude::*;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A recorded call against the control plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ShowAccount(u64),
    CreateAccount { org_name: String },
    UpdateAccount { account_id: u64, update: AccountUpdate },
    ListUsers(u64),
    ReadUser { account_id: u64, user_id: u64 },
    UpdateUser { account_id: u64, user_id: u64, update: UserUpdate },
    ActivateUser { account_id: u64, user_id: u64 },
    ListApplications(u64),
}

impl ApiCall {
    /// Whether the call mutates remote state
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            ApiCall::CreateAccount { .. }
                | ApiCall::UpdateAccount { .. }
                | ApiCall::UpdateUser { .. }
                | ApiCall::ActivateUser { .. }
        )
    }
}

#[derive(Debug, Default)]
struct ControlPlaneState {
    accounts: HashMap<u64, Account>,
    users: HashMap<u64, Vec<User>>,
    applications: HashMap<u64, Vec<Application>>,
    last_id: u64,
    journal: Vec<ApiCall>,
    show_failure: Option<ApiError>,
}

impl ControlPlaneState {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn account(&self, account_id: u64) -> Result<&Account, ApiError> {
        self.accounts
            .get(&account_id)
            .ok_or_else(|| ApiError::NotFound(format!("account {}", account_id)))
    }

    fn user_mut(&mut self, account_id: u64, user_id: u64) -> Result<&mut User, ApiError> {
        self.users
            .get_mut(&account_id)
            .and_then(|users| users.iter_mut().find(|u| u.id == user_id))
            .ok_or_else(|| ApiError::NotFound(format!("user {} of account {}", user_id, account_id)))
    }
}

/// In-memory stand-in for the remote tenant-account API
#[derive(Clone)]
pub struct InMemoryControlPlane {
    state: Arc<RwLock<ControlPlaneState>>,
    domain_suffix: String,
}

impl InMemoryControlPlane {
    pub fn new() -> Self {
        Self::with_domain_suffix("example.com")
    }

    /// Admin domains of created accounts end with `suffix`
    pub fn with_domain_suffix(suffix: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ControlPlaneState::default())),
            domain_suffix: suffix.into(),
        }
    }

    /// Seed an account with its users and applications, bypassing the journal
    pub async fn seed_account(&self, account: Account, users: Vec<User>, applications: Vec<Application>) {
        let mut state = self.state.write().await;
        state.last_id = state
            .last_id
            .max(account.id)
            .max(users.iter().map(|u| u.id).max().unwrap_or(0))
            .max(applications.iter().map(|a| a.id).max().unwrap_or(0));
        state.users.insert(account.id, users);
        state.applications.insert(account.id, applications);
        state.accounts.insert(account.id, account);
    }

    /// Replace the applications of an account
    pub async fn set_applications(&self, account_id: u64, applications: Vec<Application>) {
        self.state.write().await.applications.insert(account_id, applications);
    }

    /// Delete an account out-of-band
    pub async fn remove_account(&self, account_id: u64) {
        let mut state = self.state.write().await;
        state.accounts.remove(&account_id);
        state.users.remove(&account_id);
        state.applications.remove(&account_id);
    }

    pub async fn account(&self, account_id: u64) -> Option<Account> {
        self.state.read().await.accounts.get(&account_id).cloned()
    }

    pub async fn users(&self, account_id: u64) -> Vec<User> {
        self.state.read().await.users.get(&account_id).cloned().unwrap_or_default()
    }

    pub async fn account_count(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    /// All calls received so far, oldest first
    pub async fn journal(&self) -> Vec<ApiCall> {
        self.state.read().await.journal.clone()
    }

    /// Mutating calls received so far
    pub async fn writes(&self) -> Vec<ApiCall> {
        self.journal().await.into_iter().filter(ApiCall::is_write).collect()
    }

    /// Make the next `show_account` call fail with `err`
    pub async fn fail_next_show(&self, err: ApiError) {
        self.state.write().await.show_failure = Some(err);
    }

    pub async fn clear_journal(&self) {
        self.state.write().await.journal.clear();
    }

    fn admin_domain(&self, org_name: &str) -> String {
        let slug: String = org_name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        format!("{}-admin.{}", slug.trim_matches('-'), self.domain_suffix)
    }
}

impl Default for InMemoryControlPlane {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountApi for InMemoryControlPlane {
    async fn show_account(&self, account_id: u64) -> Lookup<Account, ApiError> {
        let mut state = self.state.write().await;
        state.journal.push(ApiCall::ShowAccount(account_id));
        if let Some(err) = state.show_failure.take() {
            return Lookup::Failed(err);
        }
        Lookup::from_result(state.account(account_id).cloned(), ApiError::is_not_found)
    }

    async fn create_account(&self, request: &NewAccount) -> Result<Account, ApiError> {
        let mut state = self.state.write().await;
        state.journal.push(ApiCall::CreateAccount {
            org_name: request.org_name.clone(),
        });

        let account_id = state.next_id();
        let account = Account {
            id: account_id,
            org_name: request.org_name.clone(),
            support_email: request.email.clone(),
            admin_domain: self.admin_domain(&request.org_name),
            state: "approved".to_string(),
        };
        let admin = User {
            id: state.next_id(),
            state: UserState::Pending,
            role: ADMIN_ROLE.to_string(),
            username: request.username.clone(),
            email: request.email.clone(),
        };
        let application = Application {
            id: state.next_id(),
            name: format!("{} provider", request.org_name),
            state: "live".to_string(),
            user_key: Uuid::new_v4().simple().to_string(),
        };

        debug!("Simulated control plane created account {}", account_id);
        state.users.insert(account_id, vec![admin]);
        state.applications.insert(account_id, vec![application]);
        state.accounts.insert(account_id, account.clone());
        Ok(account)
    }

    async fn update_account(&self, account_id: u64, update: &AccountUpdate) -> Result<Account, ApiError> {
        let mut state = self.state.write().await;
        state.journal.push(ApiCall::UpdateAccount {
            account_id,
            update: update.clone(),
        });

        let account = state
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| ApiError::NotFound(format!("account {}", account_id)))?;
        account.org_name = update.org_name.clone();
        account.support_email = update.support_email.clone();
        Ok(account.clone())
    }

    async fn list_users(&self, account_id: u64, filter: &UserFilter) -> Result<Vec<User>, ApiError> {
        let mut state = self.state.write().await;
        state.journal.push(ApiCall::ListUsers(account_id));
        state.account(account_id)?;

        let users = state.users.get(&account_id).cloned().unwrap_or_default();
        Ok(users
            .into_iter()
            .filter(|u| filter.role.as_ref().map_or(true, |role| &u.role == role))
            .filter(|u| filter.state.as_ref().map_or(true, |s| &u.state.to_string() == s))
            .collect())
    }

    async fn read_user(&self, account_id: u64, user_id: u64) -> Result<User, ApiError> {
        let mut state = self.state.write().await;
        state.journal.push(ApiCall::ReadUser { account_id, user_id });
        state.user_mut(account_id, user_id).map(|u| u.clone())
    }

    async fn update_user(&self, account_id: u64, user_id: u64, update: &UserUpdate) -> Result<User, ApiError> {
        let mut state = self.state.write().await;
        state.journal.push(ApiCall::UpdateUser {
            account_id,
            user_id,
            update: update.clone(),
        });

        let user = state.user_mut(account_id, user_id)?;
        user.username = update.username.clone();
        user.email = update.email.clone();
        Ok(user.clone())
    }

    async fn activate_user(&self, account_id: u64, user_id: u64) -> Result<(), ApiError> {
        let mut state = self.state.write().await;
        state.journal.push(ApiCall::ActivateUser { account_id, user_id });

        let user = state.user_mut(account_id, user_id)?;
        if user.state != UserState::Pending {
            return Err(ApiError::Api {
                status: 422,
                message: format!("user {} is not pending", user_id),
            });
        }
        user.state = UserState::Active;
        Ok(())
    }

    async fn list_applications(&self, account_id: u64) -> Result<Vec<Application>, ApiError> {
        let mut state = self.state.write().await;
        state.journal.push(ApiCall::ListApplications(account_id));
        state.account(account_id)?;
        Ok(state.applications.get(&account_id).cloned().unwrap_or_default())
    }
}

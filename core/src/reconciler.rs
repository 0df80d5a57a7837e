//! Tenant reconciliation.
//!
//! One run converges the remote control plane towards a [`Tenant`] record in
//! four sequential stages:
//!
//! 1. the tenant account exists and its org name / support email match;
//! 2. the administrator user is found, active and in sync;
//! 3. the access-credential secret exists (created once, never updated);
//! 4. the record's status carries the observed account and admin ids.
//!
//! Every stage checks for existing state before creating anything, so a run
//! that fails halfway can simply be repeated.

use crate::account::{Account, AccountUpdate, NewAccount, User, UserFilter, UserState, UserUpdate};
use crate::admin_url::admin_url_string;
use crate::credentials::read_secret_field;
use crate::errors::{CoreError, CoreResult, ReconcileError, Stage};
use crate::lookup::Lookup;
use crate::tenant::{
    Tenant, TenantStatus, ADMIN_PASSWORD_SECRET_FIELD, ADMIN_URL_SECRET_FIELD, OPERATOR_LABEL,
    PROVIDER_KEY_SECRET_FIELD,
};
use crate::traits::{AccountApi, SecretStore, TenantStore};
use crate::types::{ObjectMeta, Secret};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Tunables for a reconciler
#[derive(Debug, Clone)]
pub struct ReconcilerOptions {
    /// Create a fresh account when the id in status no longer exists remotely.
    /// When false the run fails with `StaleAccountId` instead.
    pub recreate_missing_accounts: bool,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            recreate_missing_accounts: true,
        }
    }
}

/// What happened to the remote account during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountAction {
    Created,
    /// Status pointed at an account the control plane no longer knows
    Recreated,
    Synced,
    Unchanged,
}

/// What happened to the credential secret during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretAction {
    Created,
    AlreadyExists,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub account_id: u64,
    pub admin_id: u64,
    pub account: AccountAction,
    pub admin_activated: bool,
    pub admin_synced: bool,
    pub secret: SecretAction,
    pub status_written: bool,
}

impl ReconcileReport {
    /// True when the run only read state
    pub fn is_noop(&self) -> bool {
        self.account == AccountAction::Unchanged
            && !self.admin_activated
            && !self.admin_synced
            && self.secret == SecretAction::AlreadyExists
            && !self.status_written
    }
}

#[derive(Debug)]
struct AdminOutcome {
    user: User,
    activated: bool,
    synced: bool,
}

/// Reconciles a single Tenant record against the control plane
pub struct TenantReconciler {
    tenants: Arc<dyn TenantStore>,
    secrets: Arc<dyn SecretStore>,
    api: Arc<dyn AccountApi>,
    options: ReconcilerOptions,
}

impl TenantReconciler {
    pub fn new(
        tenants: Arc<dyn TenantStore>,
        secrets: Arc<dyn SecretStore>,
        api: Arc<dyn AccountApi>,
    ) -> Self {
        Self {
            tenants,
            secrets,
            api,
            options: ReconcilerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReconcilerOptions) -> Self {
        self.options = options;
        self
    }

    /// Run all stages for `tenant`, updating its status in place on success.
    pub async fn run(&self, tenant: &mut Tenant) -> Result<ReconcileReport, ReconcileError> {
        let key = tenant.key();
        let span = info_span!("reconcile", tenant = %key, run_id = %Uuid::new_v4());

        async {
            let (account, account_action) = self
                .resolve_account(tenant)
                .await
                .map_err(|e| ReconcileError::new(key.clone(), Stage::Account, e))?;

            let account_created = matches!(account_action, AccountAction::Created | AccountAction::Recreated);
            let admin = self
                .resolve_admin(&account, tenant, account_created)
                .await
                .map_err(|e| ReconcileError::new(key.clone(), Stage::Admin, e))?;

            let secret_action = self
                .ensure_credential_secret(&account, tenant)
                .await
                .map_err(|e| ReconcileError::new(key.clone(), Stage::CredentialSecret, e))?;

            let status_written = self
                .write_status(tenant, &account, &admin.user)
                .await
                .map_err(|e| ReconcileError::new(key.clone(), Stage::Status, e))?;

            Ok::<_, ReconcileError>(ReconcileReport {
                account_id: account.id,
                admin_id: admin.user.id,
                account: account_action,
                admin_activated: admin.activated,
                admin_synced: admin.synced,
                secret: secret_action,
                status_written,
            })
        }
        .instrument(span)
        .await
    }

    /// Make sure the remote account exists and carries the desired attributes
    async fn resolve_account(&self, tenant: &Tenant) -> CoreResult<(Account, AccountAction)> {
        match self.fetch_account(tenant).await? {
            Some(account) => {
                info!(account_id = account.id, "Tenant account already exists");
                self.sync_account(tenant, account).await
            }
            None => {
                let account = self.create_account(tenant).await?;
                let action = if tenant.status.account_id == 0 {
                    AccountAction::Created
                } else {
                    AccountAction::Recreated
                };
                Ok((account, action))
            }
        }
    }

    async fn fetch_account(&self, tenant: &Tenant) -> CoreResult<Option<Account>> {
        let account_id = tenant.status.account_id;
        if account_id == 0 {
            return Ok(None);
        }

        match self.api.show_account(account_id).await {
            Lookup::Found(account) => Ok(Some(account)),
            Lookup::NotFound if self.options.recreate_missing_accounts => {
                warn!(account_id, "Account recorded in status not found, it will be recreated");
                Ok(None)
            }
            Lookup::NotFound => Err(CoreError::StaleAccountId { account_id }),
            Lookup::Failed(err) => Err(err.into()),
        }
    }

    async fn create_account(&self, tenant: &Tenant) -> CoreResult<Account> {
        let password = read_secret_field(
            self.secrets.as_ref(),
            &tenant.password_secret_key(),
            ADMIN_PASSWORD_SECRET_FIELD,
        )
        .await?;

        info!(
            organization = %tenant.spec.organization_name,
            username = %tenant.spec.username,
            email = %tenant.spec.email,
            "Creating a new tenant account"
        );

        let request = NewAccount {
            org_name: tenant.spec.organization_name.clone(),
            username: tenant.spec.username.clone(),
            email: tenant.spec.email.clone(),
            password,
        };
        let account = self.api.create_account(&request).await?;

        info!(account_id = account.id, "Tenant account created");
        Ok(account)
    }

    async fn sync_account(&self, tenant: &Tenant, account: Account) -> CoreResult<(Account, AccountAction)> {
        let spec = &tenant.spec;
        let drifted = spec.organization_name != account.org_name || spec.email != account.support_email;
        if !drifted {
            return Ok((account, AccountAction::Unchanged));
        }

        info!(account_id = account.id, "Syncing tenant account");
        let update = AccountUpdate {
            org_name: spec.organization_name.clone(),
            support_email: spec.email.clone(),
        };
        let updated = self.api.update_account(account.id, &update).await?;
        Ok((updated, AccountAction::Synced))
    }

    /// Make sure the administrator exists, is active and matches the Tenant
    async fn resolve_admin(&self, account: &Account, tenant: &Tenant, account_created: bool) -> CoreResult<AdminOutcome> {
        let admin_id = tenant.status.admin_id;
        // A stored admin id belongs to the previous account when we just created one
        let user = if admin_id == 0 || account_created {
            self.find_admin(account, tenant).await?
        } else {
            self.api.read_user(account.id, admin_id).await?
        };

        self.sync_admin(account, tenant, user).await
    }

    async fn find_admin(&self, account: &Account, tenant: &Tenant) -> CoreResult<User> {
        let users = self.api.list_users(account.id, &UserFilter::admins()).await?;
        debug!(account_id = account.id, count = users.len(), "Listed admin users");

        users
            .into_iter()
            .find(|user| user.username == tenant.spec.username && user.email == tenant.spec.email)
            .ok_or_else(|| CoreError::AdminUserNotFound {
                account_id: account.id,
                username: tenant.spec.username.clone(),
                email: tenant.spec.email.clone(),
            })
    }

    async fn sync_admin(&self, account: &Account, tenant: &Tenant, mut user: User) -> CoreResult<AdminOutcome> {
        // Activation precedes any profile update
        let activated = if user.is_pending() {
            info!(account_id = account.id, user_id = user.id, "Activating pending admin user");
            self.api.activate_user(account.id, user.id).await?;
            user.state = UserState::Active;
            true
        } else {
            info!(account_id = account.id, user_id = user.id, "Admin user already active");
            false
        };

        let spec = &tenant.spec;
        let drifted = spec.username != user.username || spec.email != user.email;
        if drifted {
            info!(account_id = account.id, user_id = user.id, "Syncing admin user");
            let update = UserUpdate {
                username: spec.username.clone(),
                email: spec.email.clone(),
            };
            user = self.api.update_user(account.id, user.id, &update).await?;
        }

        Ok(AdminOutcome {
            user,
            activated,
            synced: drifted,
        })
    }

    /// Make sure the secret with the tenant's access token exists
    async fn ensure_credential_secret(&self, account: &Account, tenant: &Tenant) -> CoreResult<SecretAction> {
        let key = tenant.spec.tenant_secret_ref.key();
        match self.secrets.get_secret(&key).await {
            Lookup::Found(_) => {
                info!(secret = %key, "Access token secret already exists");
                return Ok(SecretAction::AlreadyExists);
            }
            Lookup::NotFound => {}
            Lookup::Failed(err) => return Err(err.into()),
        }

        info!(secret = %key, "Creating access token secret");
        let provider_key = self.provider_key(account).await?;
        let admin_url = admin_url_string(&account.admin_domain)?;

        let metadata = ObjectMeta::new(key.namespace.clone(), key.name.clone())
            .with_label(OPERATOR_LABEL.0, OPERATOR_LABEL.1);
        let secret = Secret::new(metadata)
            .with_string_data(PROVIDER_KEY_SECRET_FIELD, provider_key)
            .with_string_data(ADMIN_URL_SECRET_FIELD, admin_url)
            .with_owner(tenant.as_owner());

        self.secrets.create_secret(secret).await?;
        Ok(SecretAction::Created)
    }

    /// The tenant's key lives on its only provisioning application
    async fn provider_key(&self, account: &Account) -> CoreResult<String> {
        let applications = self.api.list_applications(account.id).await?;
        match applications.as_slice() {
            [application] => Ok(application.user_key.clone()),
            other => Err(CoreError::UnexpectedApplicationCount {
                account_id: account.id,
                count: other.len(),
            }),
        }
    }

    /// Persist observed ids, skipping the write when nothing changed
    async fn write_status(&self, tenant: &mut Tenant, account: &Account, admin: &User) -> CoreResult<bool> {
        let status = TenantStatus::new(account.id, admin.id);
        if tenant.status == status {
            debug!("Tenant status unchanged");
            return Ok(false);
        }

        info!(account_id = status.account_id, admin_id = status.admin_id, "Updating tenant status");
        let mut updated = tenant.clone();
        updated.status = status;
        self.tenants.update_tenant_status(&updated).await?;
        *tenant = updated;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ReconcileReport {
        ReconcileReport {
            account_id: 2,
            admin_id: 5,
            account: AccountAction::Unchanged,
            admin_activated: false,
            admin_synced: false,
            secret: SecretAction::AlreadyExists,
            status_written: false,
        }
    }

    #[test]
    fn test_report_noop_detection() {
        assert!(report().is_noop());

        let written = ReconcileReport { status_written: true, ..report() };
        assert!(!written.is_noop());

        let synced = ReconcileReport { account: AccountAction::Synced, ..report() };
        assert!(!synced.is_noop());
    }

    #[test]
    fn test_default_options_recreate() {
        assert!(ReconcilerOptions::default().recreate_missing_accounts);
    }
}

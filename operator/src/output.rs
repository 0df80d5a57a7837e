//! Output formatting utilities for the operator CLI

use crate::cli::OutputFormat;
use crate::controller::PassSummary;
use crate::errors::OperatorError;
use colored::*;
use serde::Serialize;
use tabled::{Table, Tabled};
use tenant_operator_core::prelude::*;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, OperatorError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| OperatorError::Output(format!("Failed to serialize to JSON: {}", e)))
}

/// Recorded state of one Tenant
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TenantStatusView {
    pub namespace: String,
    pub name: String,
    pub organization_name: String,
    pub tenant_id: u64,
    pub admin_id: u64,
    pub credential_secret: String,
}

impl From<&Tenant> for TenantStatusView {
    fn from(tenant: &Tenant) -> Self {
        Self {
            namespace: tenant.metadata.namespace.clone(),
            name: tenant.metadata.name.clone(),
            organization_name: tenant.spec.organization_name.clone(),
            tenant_id: tenant.status.account_id,
            admin_id: tenant.status.admin_id,
            credential_secret: tenant.spec.tenant_secret_ref.key().to_string(),
        }
    }
}

/// Display the recorded status of a list of Tenants
pub fn display_tenants(tenants: &[Tenant], format: &OutputFormat) -> Result<(), OperatorError> {
    let views: Vec<TenantStatusView> = tenants.iter().map(TenantStatusView::from).collect();

    match format {
        OutputFormat::Table => {
            if views.is_empty() {
                println!("No tenants found");
                return Ok(());
            }

            let table = Table::new(views.iter().map(TenantTableRow::from));
            println!("{}", table);
        }
        OutputFormat::Json => println!("{}", to_json(&views)?),
    }
    Ok(())
}

/// Display the outcome of reconciling a single Tenant
pub fn display_report(
    key: &ObjectKey,
    report: Option<&ReconcileReport>,
    format: &OutputFormat,
) -> Result<(), OperatorError> {
    match format {
        OutputFormat::Table => match report {
            None => println!("{} {}", "Tenant not found:".yellow().bold(), key),
            Some(report) => {
                let headline = if report.is_noop() {
                    "✓ Tenant already up to date".green().bold()
                } else {
                    "✓ Tenant reconciled".green().bold()
                };
                println!("{} {}", headline, key);
                println!("{:<20} {}", "Tenant ID:".bold(), report.account_id);
                println!("{:<20} {}", "Admin ID:".bold(), report.admin_id);
                println!("{:<20} {}", "Account:".bold(), format_account_action(report.account));
                println!("{:<20} {}", "Admin activated:".bold(), yes_no(report.admin_activated));
                println!("{:<20} {}", "Admin updated:".bold(), yes_no(report.admin_synced));
                println!("{:<20} {}", "Credential secret:".bold(), format_secret_action(report.secret));
                println!("{:<20} {}", "Status written:".bold(), yes_no(report.status_written));
            }
        },
        OutputFormat::Json => println!("{}", to_json(&serde_json::json!({
            "tenant": key.to_string(),
            "report": report,
        }))?),
    }
    Ok(())
}

/// Display the counts of a single pass
pub fn display_summary(summary: &PassSummary, format: &OutputFormat) -> Result<(), OperatorError> {
    match format {
        OutputFormat::Table => {
            let failed = if summary.failed > 0 {
                summary.failed.to_string().red().bold()
            } else {
                summary.failed.to_string().normal()
            };
            println!(
                "{} tenants: {} succeeded ({} changed), {} skipped, {} failed",
                summary.total, summary.succeeded, summary.changed, summary.skipped, failed
            );
        }
        OutputFormat::Json => println!("{}", to_json(summary)?),
    }
    Ok(())
}

fn format_account_action(action: AccountAction) -> ColoredString {
    match action {
        AccountAction::Created => "created".green(),
        AccountAction::Recreated => "recreated".yellow(),
        AccountAction::Synced => "updated".blue(),
        AccountAction::Unchanged => "unchanged".normal(),
    }
}

fn format_secret_action(action: SecretAction) -> ColoredString {
    match action {
        SecretAction::Created => "created".green(),
        SecretAction::AlreadyExists => "exists".normal(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Zero ids mean the Tenant was never reconciled
fn format_id(id: u64) -> String {
    if id == 0 {
        "-".to_string()
    } else {
        id.to_string()
    }
}

/// Table row for tenant display
#[derive(Tabled)]
struct TenantTableRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Organization")]
    organization: String,
    #[tabled(rename = "Tenant ID")]
    tenant_id: String,
    #[tabled(rename = "Admin ID")]
    admin_id: String,
    #[tabled(rename = "Credentials")]
    credential_secret: String,
}

impl From<&TenantStatusView> for TenantTableRow {
    fn from(view: &TenantStatusView) -> Self {
        Self {
            namespace: view.namespace.clone(),
            name: view.name.clone(),
            organization: view.organization_name.clone(),
            tenant_id: format_id(view.tenant_id),
            admin_id: format_id(view.admin_id),
            credential_secret: view.credential_secret.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> Tenant {
        Tenant::new(
            ObjectMeta::new("tenants", "acme"),
            TenantSpec {
                username: "admin".to_string(),
                email: "admin@acme.test".to_string(),
                organization_name: "Acme".to_string(),
                system_master_url: "https://master.example.com".to_string(),
                tenant_secret_ref: SecretRef {
                    name: "acme-credentials".to_string(),
                    namespace: "operators".to_string(),
                },
                password_credentials_ref: LocalSecretRef { name: "acme-password".to_string() },
                master_credentials_ref: LocalSecretRef { name: "system-seed".to_string() },
            },
        )
    }

    #[test]
    fn test_status_view_json_shape() {
        let tenant = tenant().with_status(TenantStatus::new(7, 9));
        let json = serde_json::to_value(TenantStatusView::from(&tenant)).unwrap();
        assert_eq!(json["tenantId"], 7);
        assert_eq!(json["adminId"], 9);
        assert_eq!(json["credentialSecret"], "operators/acme-credentials");
    }

    #[test]
    fn test_unreconciled_ids_render_as_dash() {
        let view = TenantStatusView::from(&tenant());
        let row = TenantTableRow::from(&view);
        assert_eq!(row.tenant_id, "-");
        assert_eq!(row.admin_id, "-");
        assert_eq!(format_id(12), "12");
    }

    #[test]
    fn test_table_contains_headers() {
        let view = TenantStatusView::from(&tenant().with_status(TenantStatus::new(7, 9)));
        let table = Table::new([TenantTableRow::from(&view)]).to_string();
        assert!(table.contains("Tenant ID"));
        assert!(table.contains("Acme"));
    }
}

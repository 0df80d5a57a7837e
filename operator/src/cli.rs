//! CLI argument definitions

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tenant-operator")]
#[command(about = "Reconciles 3scale Tenant resources against the porta master API")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Only watch Tenants in this namespace (default: all namespaces)
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile every Tenant periodically until interrupted
    Run {
        /// Seconds between reconciliation passes
        #[arg(short, long)]
        interval: Option<u64>,
        /// Run a single pass and exit
        #[arg(long)]
        once: bool,
    },
    /// Reconcile one Tenant and print what changed
    Reconcile {
        /// Namespace of the Tenant
        #[arg(value_name = "NAMESPACE")]
        tenant_namespace: String,
        /// Name of the Tenant
        name: String,
    },
    /// Show the recorded status of every Tenant
    Status,
    /// Print the Tenant CustomResourceDefinition
    Crd,
}

#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["tenant-operator", "-vv", "run", "--interval", "10"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Run { interval: Some(10), once: false }));

        let cli = Cli::parse_from(["tenant-operator", "-n", "watched", "reconcile", "tenants", "acme", "-f", "json"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.namespace.as_deref(), Some("watched"));
        match cli.command {
            Commands::Reconcile { tenant_namespace, name } => {
                assert_eq!(tenant_namespace, "tenants");
                assert_eq!(name, "acme");
            }
            _ => panic!("expected reconcile"),
        }

        let cli = Cli::parse_from(["tenant-operator", "crd"]);
        assert!(matches!(cli.command, Commands::Crd));
    }
}

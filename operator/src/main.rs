//! Operator keeping 3scale tenants in line with their Tenant resources

use clap::Parser;
use std::process;
use tracing::{error, info};
use tenant_operator_core::types::ObjectKey;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod controller;
mod errors;
mod factory;
mod output;

use cli::*;
use config::OperatorConfig;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // RUST_LOG takes precedence over -v
    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match OperatorConfig::load(&args.config).await {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let config = config.with_overrides(&args);

    let result = match args.command {
        Commands::Run { once, .. } => commands::run::handle_run_command(once, &config).await,
        Commands::Reconcile { ref tenant_namespace, ref name } => {
            let key = ObjectKey::new(tenant_namespace, name);
            commands::reconcile::handle_reconcile_command(&key, &config).await
        }
        Commands::Status => commands::status::handle_status_command(&config).await,
        Commands::Crd => commands::crd::handle_crd_command(),
    };

    match result {
        Ok(_) => {
            info!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {}", e);
            process::exit(1);
        }
    }
}

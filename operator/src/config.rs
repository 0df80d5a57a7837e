//! Configuration management for the operator

use crate::cli::{Cli, Commands, OutputFormat};
use figment::{Figment, providers::{Format, Yaml, Env}};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tenant_operator_core::errors::CoreError;
use tenant_operator_core::reconciler::ReconcilerOptions;

/// Settings for talking to the porta master API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortaSettings {
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl Default for PortaSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            accept_invalid_certs: false,
        }
    }
}

/// Configuration for the operator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Namespace to watch; all namespaces when unset
    pub namespace: Option<String>,
    /// Seconds between reconciliation passes
    pub resync_interval_secs: u64,
    /// Recreate accounts whose recorded id no longer exists remotely
    pub recreate_missing_accounts: bool,
    /// Field manager used for status patches
    pub field_manager: String,
    /// Default output format
    pub default_format: OutputFormat,
    pub porta: PortaSettings,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            resync_interval_secs: 30,
            recreate_missing_accounts: true,
            field_manager: "tenant-operator".to_string(),
            default_format: OutputFormat::Table,
            porta: PortaSettings::default(),
        }
    }
}

impl OperatorConfig {
    /// Load configuration from file and environment
    pub async fn load(config_path: &Option<std::path::PathBuf>) -> Result<Self, CoreError> {
        let mut figment = Figment::new();

        // Load from default config file if it exists
        let default_config_paths = [
            "tenant-operator.yaml",
            "tenant-operator.yml",
            ".tenant-operator.yaml",
            ".tenant-operator.yml",
        ];

        for path in &default_config_paths {
            if Path::new(path).exists() {
                figment = figment.merge(Yaml::file(path));
                break;
            }
        }

        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Yaml::file(path));
            } else {
                return Err(CoreError::Configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
        }

        // TENANT_OPERATOR_PORTA__TIMEOUT_MS sets porta.timeout_ms
        figment = figment.merge(Env::prefixed("TENANT_OPERATOR_").split("__"));

        figment.extract()
            .map_err(|e| CoreError::Configuration(format!("Failed to parse configuration: {}", e)))
    }

    /// Apply CLI argument overrides to the configuration
    pub fn with_overrides(mut self, args: &Cli) -> Self {
        if let Some(ref namespace) = args.namespace {
            self.namespace = Some(namespace.clone());
        }

        if let Some(ref format) = args.format {
            self.default_format = format.clone();
        }

        if let Commands::Run { interval: Some(interval), .. } = args.command {
            self.resync_interval_secs = interval;
        }

        self
    }

    /// Interval between passes, never shorter than one second
    pub fn resync_interval(&self) -> Duration {
        Duration::from_secs(self.resync_interval_secs.max(1))
    }

    pub fn reconciler_options(&self) -> ReconcilerOptions {
        ReconcilerOptions {
            recreate_missing_accounts: self.recreate_missing_accounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::NamedTempFile;
    use std::io::Write;

    #[tokio::test]
    async fn test_default_config() {
        let config = OperatorConfig::default();
        assert_eq!(config.resync_interval_secs, 30);
        assert!(config.recreate_missing_accounts);
        assert_eq!(config.porta.timeout_ms, 30_000);
        assert!(config.namespace.is_none());
    }

    #[tokio::test]
    async fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "namespace: tenants").unwrap();
        writeln!(temp_file, "resync_interval_secs: 60").unwrap();
        writeln!(temp_file, "recreate_missing_accounts: false").unwrap();
        writeln!(temp_file, "porta:").unwrap();
        writeln!(temp_file, "  accept_invalid_certs: true").unwrap();

        let config = OperatorConfig::load(&Some(temp_file.path().to_path_buf())).await.unwrap();
        assert_eq!(config.namespace.as_deref(), Some("tenants"));
        assert_eq!(config.resync_interval_secs, 60);
        assert!(!config.reconciler_options().recreate_missing_accounts);
        assert!(config.porta.accept_invalid_certs);
        // Unset nested fields keep their defaults
        assert_eq!(config.porta.timeout_ms, 30_000);
    }

    #[tokio::test]
    async fn test_missing_config_file_is_an_error() {
        let result = OperatorConfig::load(&Some("/nonexistent/tenant-operator.yaml".into())).await;
        assert!(matches!(result, Err(CoreError::Configuration(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let args = Cli::parse_from(["tenant-operator", "-n", "tenants", "-f", "json", "run", "-i", "5"]);
        let config = OperatorConfig::default().with_overrides(&args);
        assert_eq!(config.namespace.as_deref(), Some("tenants"));
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(config.resync_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_resync_interval_floor() {
        let config = OperatorConfig {
            resync_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.resync_interval(), Duration::from_secs(1));
    }
}

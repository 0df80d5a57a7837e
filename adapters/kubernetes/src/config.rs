//! Configuration types for the Kubernetes adapter

use serde::{Deserialize, Serialize};

/// Configuration for the Kubernetes-backed stores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KubernetesConfig {
    /// Field manager recorded on status patches
    pub field_manager: String,
}

impl Default for KubernetesConfig {
    fn default() -> Self {
        Self {
            field_manager: "tenant-operator".to_string(),
        }
    }
}

impl KubernetesConfig {
    /// Set the field manager name
    pub fn with_field_manager(mut self, field_manager: impl Into<String>) -> Self {
        self.field_manager = field_manager.into();
        self
    }
}

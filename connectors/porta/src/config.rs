//! Configuration for the porta connector

use serde::{Deserialize, Serialize};

/// Master API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortaConfig {
    /// Base URL of the master portal, e.g. `https://master.3scale.example.com`
    pub base_url: String,
    /// Master access token
    pub access_token: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Skip TLS certificate verification (self-signed development clusters)
    pub accept_invalid_certs: bool,
}

impl PortaConfig {
    /// Create a new config for the given master portal and token
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            timeout_ms: 30_000,
            accept_invalid_certs: false,
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Allow self-signed certificates
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

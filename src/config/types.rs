use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,

    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,

    pub policies: PolicyConfig,
    pub credentials: CredentialConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            log_level: "info".to_string(),
            policies: PolicyConfig::default(),
            credentials: CredentialConfig::default(),
        }
    }
}

/// gRPC listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5005,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub source: PolicySource,
}

/// Where PostTranslateModify takes its CertificatePolicies from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySource {
    /// Policies attached to the request by Envoy Gateway
    #[default]
    ExtensionResources,
    /// All CertificatePolicies listed from the cluster
    Kubernetes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    pub backend: CredentialBackend,

    /// Base directory of the `directory` backend, laid out as
    /// `<directory>/<namespace>/<name>/{tls.crt,tls.key}`
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialBackend {
    /// core/v1 Secrets read through the Kubernetes API
    #[default]
    Kubernetes,
    Directory,
}

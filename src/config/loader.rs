use std::path::Path;

use crate::cli::Cli;
use crate::error::{Error, Result};

use super::types::{Config, CredentialBackend};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Build the configuration from an optional YAML file plus CLI overrides
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => Config::default(),
    };

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }

    validate_config(&config)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    // An empty file is an all-defaults config
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Validate configuration for correctness
fn validate_config(config: &Config) -> Result<()> {
    if config.server.host.is_empty() {
        return Err(Error::Config("Server host cannot be empty".to_string()));
    }
    if config.server.port == 0 {
        return Err(Error::Config("Server port cannot be 0".to_string()));
    }

    if !LOG_LEVELS.contains(&config.log_level.to_ascii_lowercase().as_str()) {
        return Err(Error::Config(format!(
            "Unknown log level '{}', expected one of {}",
            config.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    if config.credentials.backend == CredentialBackend::Directory {
        match &config.credentials.directory {
            None => {
                return Err(Error::Config(
                    "The directory credential backend requires credentials.directory".to_string(),
                ));
            }
            Some(dir) if dir.as_os_str().is_empty() => {
                return Err(Error::Config(
                    "Credential directory cannot be empty".to_string(),
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicySource;
    use clap::Parser;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        let yaml = r#"
server:
  host: 127.0.0.1
  port: 6000

log_level: debug

policies:
  source: kubernetes

credentials:
  backend: directory
  directory: /var/lib/certificates
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.server.address(), "127.0.0.1:6000");
        assert_eq!(config.policies.source, PolicySource::Kubernetes);
        assert_eq!(config.credentials.backend, CredentialBackend::Directory);
        assert_eq!(
            config.credentials.directory,
            Some(PathBuf::from("/var/lib/certificates"))
        );
    }

    #[test]
    fn test_defaults() {
        let yaml = r#"
server:
  port: 5006
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5006);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.policies.source, PolicySource::ExtensionResources);
        assert_eq!(config.credentials.backend, CredentialBackend::Kubernetes);
    }

    #[test]
    fn test_empty_host() {
        let yaml = r#"
server:
  host: ""
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_port() {
        let yaml = r#"
server:
  port: 0
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_log_level() {
        let yaml = r#"
log_level: verbose
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_directory_backend_without_directory() {
        let yaml = r#"
credentials:
  backend: directory
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_policy_source() {
        let yaml = r#"
policies:
  source: gateway_api
"#;
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server:\n  host: 10.0.0.1\n  port: 7000\nlog_level: warn").unwrap();

        let cli = Cli::try_parse_from([
            "certificate-policy-extension",
            "--config",
            file.path().to_str().unwrap(),
            "--port",
            "7001",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let config = load_config(&cli).unwrap();
        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.server.port, 7001);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_without_config_file() {
        let cli = Cli::try_parse_from(["certificate-policy-extension"]).unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.server.address(), "0.0.0.0:5005");
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from([
            "certificate-policy-extension",
            "--config",
            "/nonexistent/extension.yaml",
        ])
        .unwrap();
        assert!(matches!(load_config(&cli), Err(Error::Io(_))));
    }
}

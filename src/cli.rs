//! Command-line interface
use std::path::PathBuf;

use clap::Parser;

/// Envoy Gateway extension server for CertificatePolicy resources
#[derive(Parser, Debug)]
#[command(name = "certificate-policy-extension")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

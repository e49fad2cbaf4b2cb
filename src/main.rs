mod cli;
mod config;
mod credentials;
mod envoy;
mod error;
mod extension;
mod policy;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::{Config, CredentialBackend, PolicySource, load_config};
use credentials::{CredentialStore, DirectoryCredentialStore, KubernetesCredentialStore};
use extension::{ExtensionServer, TranslationPolicies};
use policy::KubernetesPolicyStore;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration before logging so the log level can come from it
    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "certificate_policy_extension={}",
                    config.log_level.to_ascii_lowercase()
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> error::Result<()> {
    let addr = config.server.address();
    info!(
        %addr,
        policy_source = ?config.policies.source,
        credential_backend = ?config.credentials.backend,
        "Starting certificate-policy-extension"
    );

    let needs_kubernetes = config.credentials.backend == CredentialBackend::Kubernetes
        || config.policies.source == PolicySource::Kubernetes;
    let client = if needs_kubernetes {
        Some(kube::Client::try_default().await?)
    } else {
        None
    };

    let credentials: Arc<dyn CredentialStore> = match (config.credentials.backend, &client) {
        (CredentialBackend::Kubernetes, Some(client)) => {
            Arc::new(KubernetesCredentialStore::new(client.clone()))
        }
        (CredentialBackend::Directory, _) => {
            let directory = config.credentials.directory.clone().ok_or_else(|| {
                error::Error::Config("credentials.directory is not set".to_string())
            })?;
            info!(directory = %directory.display(), "Reading credentials from directory");
            Arc::new(DirectoryCredentialStore::new(directory))
        }
        (CredentialBackend::Kubernetes, None) => {
            return Err(error::Error::Config(
                "Kubernetes client was not initialized".to_string(),
            ));
        }
    };

    let translation_policies = match (config.policies.source, client) {
        (PolicySource::Kubernetes, Some(client)) => {
            TranslationPolicies::Listed(Arc::new(KubernetesPolicyStore::new(client)))
        }
        (PolicySource::Kubernetes, None) => {
            return Err(error::Error::Config(
                "Kubernetes client was not initialized".to_string(),
            ));
        }
        (PolicySource::ExtensionResources, _) => TranslationPolicies::Attached,
    };

    // Setup shutdown signal
    let shutdown = async {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = wait_for_signal(signal::unix::SignalKind::terminate());
        #[cfg(unix)]
        let quit = wait_for_signal(signal::unix::SignalKind::quit());

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();
        #[cfg(not(unix))]
        let quit = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
            _ = terminate => info!("Received SIGTERM, shutting down"),
            _ = quit => info!("Received SIGQUIT, shutting down"),
        }
    };

    let server = ExtensionServer::new(credentials, translation_policies);
    server.run(&addr, shutdown).await?;

    info!("Shutdown complete");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal(kind: signal::unix::SignalKind) {
    match signal::unix::signal(kind) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!(error = %e, "Failed to install signal handler");
            std::future::pending::<()>().await;
        }
    }
}

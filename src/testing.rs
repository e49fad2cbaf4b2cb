//! Fixtures shared by the unit tests
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use xds_api::pb::envoy::config::core::v3::TransportSocket;
use xds_api::pb::envoy::config::core::v3::transport_socket::ConfigType;
use xds_api::pb::envoy::config::listener::v3::FilterChain;

use crate::credentials::{
    CredentialKey, CredentialStore, StoredCredential, TLS_CERT_KEY, TLS_PRIVATE_KEY_KEY,
};
use crate::envoy::DownstreamTlsContext;
use crate::error::{Error, Result};
use crate::extension::{ExtensionResource, ExtensionServer, TranslationPolicies};
use crate::policy::{CertificatePolicy, CertificatePolicySpec, PolicyMetadata, PolicyStore};

pub fn policy(namespace: &str, secret_name: &str) -> CertificatePolicy {
    CertificatePolicy {
        api_version: "example.extensions.io/v1alpha1".to_string(),
        kind: "CertificatePolicy".to_string(),
        metadata: PolicyMetadata {
            name: "test-policy".to_string(),
            namespace: namespace.to_string(),
        },
        spec: CertificatePolicySpec {
            target_refs: Vec::new(),
            secret_name: secret_name.to_string(),
        },
    }
}

/// Wrap a policy the way Envoy Gateway forwards it
pub fn extension_resource(policy: &CertificatePolicy) -> ExtensionResource {
    ExtensionResource {
        unstructured_bytes: serde_json::to_vec(policy).unwrap(),
    }
}

pub fn tls_transport_socket(context: DownstreamTlsContext) -> TransportSocket {
    TransportSocket {
        name: "envoy.transport_sockets.tls".to_string(),
        config_type: Some(ConfigType::TypedConfig(context.to_any())),
    }
}

/// Names of the SDS certificate configs on a filter chain's TLS context
pub fn sds_secret_names(filter_chain: &FilterChain) -> Vec<String> {
    let Some(ConfigType::TypedConfig(any)) = filter_chain
        .transport_socket
        .as_ref()
        .and_then(|socket| socket.config_type.as_ref())
    else {
        panic!("filter chain {} has no typed transport socket", filter_chain.name);
    };

    DownstreamTlsContext::from_any(any)
        .unwrap()
        .common_tls_context
        .map(|common| {
            common
                .tls_certificate_sds_secret_configs
                .into_iter()
                .map(|config| config.name)
                .collect()
        })
        .unwrap_or_default()
}

pub fn tls_credential(cert_chain: &[u8], private_key: &[u8]) -> StoredCredential {
    [
        (TLS_CERT_KEY, cert_chain.to_vec()),
        (TLS_PRIVATE_KEY_KEY, private_key.to_vec()),
    ]
    .into_iter()
    .collect()
}

pub fn test_server() -> ExtensionServer {
    ExtensionServer::new(
        Arc::new(MemoryCredentialStore::default()),
        TranslationPolicies::Attached,
    )
}

/// In-memory credential store that counts lookups. Clones share the counter.
#[derive(Clone, Default)]
pub struct MemoryCredentialStore {
    credentials: HashMap<CredentialKey, StoredCredential>,
    unavailable: bool,
    lookups: Arc<AtomicUsize>,
}

impl MemoryCredentialStore {
    /// A store whose every lookup fails
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn with(mut self, namespace: &str, name: &str, credential: StoredCredential) -> Self {
        self.credentials
            .insert(CredentialKey::new(namespace, name), credential);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, key: &CredentialKey) -> Result<Option<StoredCredential>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(Error::Io(std::io::Error::other("credential store unavailable")));
        }
        Ok(self.credentials.get(key).cloned())
    }
}

pub struct StaticPolicyStore {
    policies: Option<Vec<CertificatePolicy>>,
}

impl StaticPolicyStore {
    pub fn new(policies: Vec<CertificatePolicy>) -> Self {
        Self {
            policies: Some(policies),
        }
    }

    /// A store whose listing always fails
    pub fn unavailable() -> Self {
        Self { policies: None }
    }
}

#[async_trait]
impl PolicyStore for StaticPolicyStore {
    async fn list(&self) -> Result<Vec<CertificatePolicy>> {
        self.policies
            .clone()
            .ok_or_else(|| Error::Io(std::io::Error::other("policy store unavailable")))
    }
}

mod directory;
mod fetch;
mod kubernetes;

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::policy::CertificatePolicy;

pub use directory::DirectoryCredentialStore;
pub use fetch::fetch_secret;
pub use kubernetes::KubernetesCredentialStore;

/// Key holding the PEM certificate chain (`corev1.TLSCertKey`)
pub const TLS_CERT_KEY: &str = "tls.crt";
/// Key holding the PEM private key (`corev1.TLSPrivateKeyKey`)
pub const TLS_PRIVATE_KEY_KEY: &str = "tls.key";

/// Location of a stored credential
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialKey {
    pub namespace: String,
    pub name: String,
}

impl CredentialKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// The secret a policy references, which lives in the policy's namespace
    pub fn for_policy(policy: &CertificatePolicy) -> Self {
        Self::new(policy.namespace(), policy.secret_name())
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Raw fields of a stored credential, keyed like a Kubernetes Secret's data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredCredential {
    pub data: BTreeMap<String, Vec<u8>>,
}

impl StoredCredential {
    pub fn get(&self, field: &str) -> Option<&[u8]> {
        self.data.get(field).map(Vec::as_slice)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<u8>)> for StoredCredential {
    fn from_iter<I: IntoIterator<Item = (K, Vec<u8>)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Read-only access to the backing secret store
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a credential; `Ok(None)` when it doesn't exist
    async fn get(&self, key: &CredentialKey) -> Result<Option<StoredCredential>>;
}

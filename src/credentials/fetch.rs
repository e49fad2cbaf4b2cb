use tracing::debug;
use xds_api::pb::envoy::extensions::transport_sockets::tls::v3::Secret;

use crate::envoy::build_tls_secret;
use crate::error::{Error, Result};
use crate::policy::CertificatePolicy;

use super::{CredentialKey, CredentialStore, TLS_CERT_KEY, TLS_PRIVATE_KEY_KEY};

/// Fetch the TLS secret a policy references and convert it to an Envoy Secret
///
/// The secret lives in the policy's own namespace. The Envoy secret is named
/// `<namespace>/<name>` so it stays unique across namespaces.
pub async fn fetch_secret(
    store: &dyn CredentialStore,
    policy: &CertificatePolicy,
) -> Result<Secret> {
    let key = CredentialKey::for_policy(policy);

    let credential = store
        .get(&key)
        .await?
        .ok_or_else(|| Error::CredentialNotFound {
            namespace: key.namespace.clone(),
            name: key.name.clone(),
        })?;

    let missing = |field| Error::MissingCredentialField {
        namespace: key.namespace.clone(),
        name: key.name.clone(),
        field,
    };
    let cert_chain = credential
        .get(TLS_CERT_KEY)
        .ok_or_else(|| missing(TLS_CERT_KEY))?;
    let private_key = credential
        .get(TLS_PRIVATE_KEY_KEY)
        .ok_or_else(|| missing(TLS_PRIVATE_KEY_KEY))?;

    let name = key.to_string();
    debug!(secret = %name, cert_chain_len = cert_chain.len(), "Fetched TLS secret");

    Ok(build_tls_secret(&name, cert_chain.to_vec(), private_key.to_vec()))
}

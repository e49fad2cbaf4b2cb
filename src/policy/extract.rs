use tracing::{debug, error};

use crate::error::Result;
use crate::extension::ExtensionResource;

use super::types::CertificatePolicy;

/// Decode a single extension resource into a CertificatePolicy
///
/// Envoy Gateway forwards each attached policy as the JSON form of the
/// Kubernetes object. A policy without a secret name is treated as malformed.
pub fn decode_policy(resource: &ExtensionResource) -> Result<CertificatePolicy> {
    let policy: CertificatePolicy = serde_json::from_slice(&resource.unstructured_bytes)?;
    policy.validate()?;
    Ok(policy)
}

/// Collect all CertificatePolicies from the extension resources of a request.
///
/// Malformed entries are logged and skipped; the survivors keep their order.
pub fn extract_policies(resources: &[ExtensionResource]) -> Vec<CertificatePolicy> {
    resources
        .iter()
        .enumerate()
        .filter_map(|(index, resource)| match decode_policy(resource) {
            Ok(policy) => {
                debug!(
                    index,
                    policy = policy.name(),
                    namespace = policy.namespace(),
                    secret_name = policy.secret_name(),
                    targets = %policy.targets(),
                    "Decoded CertificatePolicy from extension resource"
                );
                Some(policy)
            }
            Err(e) => {
                error!(index, error = %e, "Failed to decode extension resource");
                None
            }
        })
        .collect()
}

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// API group of the CertificatePolicy custom resource
pub const POLICY_GROUP: &str = "example.extensions.io";
pub const POLICY_VERSION: &str = "v1alpha1";
pub const POLICY_KIND: &str = "CertificatePolicy";
pub const POLICY_PLURAL: &str = "certificatepolicies";

/// A CertificatePolicy as delivered by Envoy Gateway or listed from the cluster.
///
/// Only the fields this server reads are modelled; anything else in the
/// object (status, annotations, ...) is ignored on decode.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePolicy {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub metadata: PolicyMetadata,
    pub spec: CertificatePolicySpec,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PolicyMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePolicySpec {
    /// Listeners (and sections) the policy attaches to. Resolved by Envoy
    /// Gateway before the policy reaches us.
    #[serde(default)]
    pub target_refs: Vec<PolicyTargetReference>,

    /// Name of the TLS Secret, in the policy's namespace
    pub secret_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyTargetReference {
    #[serde(default)]
    pub group: String,
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
}

impl std::fmt::Display for PolicyTargetReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.group, self.kind, self.name)?;
        if let Some(section) = &self.section_name {
            write!(f, "#{section}")?;
        }
        Ok(())
    }
}

impl CertificatePolicy {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn secret_name(&self) -> &str {
        &self.spec.secret_name
    }

    /// Target references joined for log output
    pub fn targets(&self) -> String {
        self.spec
            .target_refs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Reject objects of another kind and policies that don't name a secret
    ///
    /// An object without type metadata is taken to be a CertificatePolicy.
    pub fn validate(&self) -> Result<()> {
        let group = self.api_version.split_once('/').map(|(group, _)| group);
        let foreign_group = group.is_some_and(|group| group != POLICY_GROUP);
        let foreign_kind = !self.kind.is_empty() && self.kind != POLICY_KIND;
        if foreign_group || foreign_kind {
            return Err(Error::UnexpectedKind {
                api_version: self.api_version.clone(),
                kind: self.kind.clone(),
            });
        }

        if self.spec.secret_name.is_empty() {
            return Err(Error::EmptySecretName {
                namespace: self.metadata.namespace.clone(),
                name: self.metadata.name.clone(),
            });
        }

        // Both end up as path segments and API lookups scoped to the namespace
        if !is_dns1123_label(&self.metadata.namespace) {
            return Err(Error::InvalidName {
                field: "namespace",
                value: self.metadata.namespace.clone(),
            });
        }
        if !is_dns1123_subdomain(&self.spec.secret_name) {
            return Err(Error::InvalidName {
                field: "secretName",
                value: self.spec.secret_name.clone(),
            });
        }
        Ok(())
    }
}

/// Lowercase alphanumerics and `-`, alphanumeric at both ends, at most 63 chars
fn is_dns1123_label(value: &str) -> bool {
    let bytes = value.as_bytes();
    let alnum = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    !bytes.is_empty()
        && bytes.len() <= 63
        && bytes.first().is_some_and(alnum)
        && bytes.last().is_some_and(alnum)
        && bytes.iter().all(|b| alnum(b) || *b == b'-')
}

/// Dot-separated DNS-1123 labels, at most 253 chars
fn is_dns1123_subdomain(value: &str) -> bool {
    value.len() <= 253 && value.split('.').all(is_dns1123_label)
}

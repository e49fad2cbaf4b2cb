use async_trait::async_trait;
use kube::api::{Api, ListParams};
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use kube::Client;
use tracing::{debug, warn};

use crate::error::Result;

use super::types::{CertificatePolicy, POLICY_GROUP, POLICY_KIND, POLICY_PLURAL, POLICY_VERSION};

/// Source of CertificatePolicies that is independent of the request
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn list(&self) -> Result<Vec<CertificatePolicy>>;
}

/// Lists CertificatePolicy custom resources across all namespaces
pub struct KubernetesPolicyStore {
    client: Client,
    resource: ApiResource,
}

impl KubernetesPolicyStore {
    pub fn new(client: Client) -> Self {
        let gvk = GroupVersionKind::gvk(POLICY_GROUP, POLICY_VERSION, POLICY_KIND);
        Self {
            client,
            resource: ApiResource::from_gvk_with_plural(&gvk, POLICY_PLURAL),
        }
    }
}

#[async_trait]
impl PolicyStore for KubernetesPolicyStore {
    async fn list(&self) -> Result<Vec<CertificatePolicy>> {
        let api: Api<DynamicObject> = Api::all_with(self.client.clone(), &self.resource);
        let objects = api.list(&ListParams::default()).await?;

        let mut policies = Vec::with_capacity(objects.items.len());
        for object in objects.items {
            match decode_object(&object) {
                Ok(policy) => policies.push(policy),
                Err(e) => {
                    warn!(
                        name = object.metadata.name.as_deref().unwrap_or_default(),
                        namespace = object.metadata.namespace.as_deref().unwrap_or_default(),
                        error = %e,
                        "Skipping undecodable CertificatePolicy"
                    );
                }
            }
        }

        debug!(count = policies.len(), "Listed CertificatePolicies");
        Ok(policies)
    }
}

fn decode_object(object: &DynamicObject) -> Result<CertificatePolicy> {
    let value = serde_json::to_value(object)?;
    let policy: CertificatePolicy = serde_json::from_value(value)?;
    policy.validate()?;
    Ok(policy)
}

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};

use crate::error::Result;

use super::{CredentialKey, CredentialStore, StoredCredential};

/// Reads `core/v1` Secrets through the Kubernetes API
pub struct KubernetesCredentialStore {
    client: Client,
}

impl KubernetesCredentialStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CredentialStore for KubernetesCredentialStore {
    async fn get(&self, key: &CredentialKey) -> Result<Option<StoredCredential>> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), &key.namespace);
        let secret = api.get_opt(&key.name).await?;
        Ok(secret.map(into_credential))
    }
}

fn into_credential(secret: Secret) -> StoredCredential {
    secret
        .data
        .unwrap_or_default()
        .into_iter()
        .map(|(field, value)| (field, value.0))
        .collect()
}

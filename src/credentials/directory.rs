use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::{CredentialKey, CredentialStore, StoredCredential, TLS_CERT_KEY, TLS_PRIVATE_KEY_KEY};

/// Reads credentials laid out on disk like mounted Kubernetes TLS secrets:
///
/// ```text
/// <base_dir>/<namespace>/<name>/tls.crt
/// <base_dir>/<namespace>/<name>/tls.key
/// ```
pub struct DirectoryCredentialStore {
    base_dir: PathBuf,
}

impl DirectoryCredentialStore {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Each key component must stay a single directory level below its parent
    fn credential_dir(&self, key: &CredentialKey) -> Result<PathBuf> {
        let namespace = single_component("namespace", &key.namespace)?;
        let name = single_component("name", &key.name)?;
        Ok(self.base_dir.join(namespace).join(name))
    }
}

#[async_trait]
impl CredentialStore for DirectoryCredentialStore {
    async fn get(&self, key: &CredentialKey) -> Result<Option<StoredCredential>> {
        let dir = self.credential_dir(key)?;
        if !tokio::fs::try_exists(&dir).await? {
            return Ok(None);
        }

        let mut credential = StoredCredential::default();
        for field in [TLS_CERT_KEY, TLS_PRIVATE_KEY_KEY] {
            match tokio::fs::read(dir.join(field)).await {
                Ok(content) => {
                    credential.data.insert(field.to_string(), content);
                }
                // Leave the field out; the fetcher reports which one is missing
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(Some(credential))
    }
}

fn single_component<'a>(field: &'static str, value: &'a str) -> Result<&'a Path> {
    let path = Path::new(value);
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(Error::InvalidName {
            field,
            value: value.to_string(),
        }),
    }
}

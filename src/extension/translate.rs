use tracing::{debug, error, info};
use xds_api::pb::envoy::extensions::transport_sockets::tls::v3::Secret;

use crate::credentials::{CredentialKey, fetch_secret};
use crate::policy::{CertificatePolicy, extract_policies};

use super::proto::{PostTranslateModifyRequest, PostTranslateModifyResponse};
use super::server::{ExtensionServer, TranslationPolicies};

impl ExtensionServer {
    /// Append the TLS secret of every CertificatePolicy to the translated secrets
    ///
    /// Existing secrets are always kept. A policy whose secret can't be
    /// fetched is logged and skipped; clusters, listeners and routes are
    /// returned untouched.
    pub async fn modify_translation(
        &self,
        request: PostTranslateModifyRequest,
    ) -> PostTranslateModifyResponse {
        info!("PostTranslateModify callback was invoked");
        debug!(
            clusters = request.clusters.len(),
            secrets = request.secrets.len(),
            listeners = request.listeners.len(),
            routes = request.routes.len(),
            extension_resources = request
                .post_translate_context
                .as_ref()
                .map_or(0, |ctx| ctx.extension_resources.len()),
            "Request details"
        );

        let PostTranslateModifyRequest {
            post_translate_context,
            clusters,
            mut secrets,
            listeners,
            routes,
        } = request;

        let policies = match &self.translation_policies {
            TranslationPolicies::Attached => extract_policies(
                &post_translate_context
                    .map(|ctx| ctx.extension_resources)
                    .unwrap_or_default(),
            ),
            TranslationPolicies::Listed(store) => match store.list().await {
                Ok(policies) => policies,
                Err(e) => {
                    error!(error = %e, "Failed to list CertificatePolicies");
                    Vec::new()
                }
            },
        };

        info!(count = policies.len(), "Fetched CertificatePolicies");

        let existing = secrets.len();
        for policy in &policies {
            self.append_policy_secret(policy, &mut secrets).await;
        }

        debug!(
            total = secrets.len(),
            added = secrets.len() - existing,
            "Response summary"
        );

        PostTranslateModifyResponse {
            clusters,
            secrets,
            listeners,
            routes,
        }
    }

    /// Fetch and append the secret of one policy.
    ///
    /// A policy whose secret name is already in the list is skipped without a
    /// fetch, so two policies naming the same credential yield one secret.
    async fn append_policy_secret(
        &self,
        policy: &CertificatePolicy,
        secrets: &mut Vec<Secret>,
    ) {
        debug!(
            policy = policy.name(),
            namespace = policy.namespace(),
            secret_name = policy.secret_name(),
            "Processing CertificatePolicy"
        );

        let secret_name = CredentialKey::for_policy(policy).to_string();
        if secrets.iter().any(|s| s.name == secret_name) {
            debug!(secret = %secret_name, "Secret already in response");
            return;
        }

        match fetch_secret(self.credentials.as_ref(), policy).await {
            Ok(secret) => {
                info!(secret = %secret.name, "Added secret to response");
                secrets.push(secret);
            }
            Err(e) => {
                error!(
                    policy = policy.name(),
                    secret_name = policy.secret_name(),
                    error = %e,
                    "Failed to fetch secret for policy"
                );
            }
        }
    }
}

use tracing::{debug, error, info};

use crate::envoy::inject_sds_secret_configs;
use crate::policy::extract_policies;

use super::proto::{PostHttpListenerModifyRequest, PostHttpListenerModifyResponse};
use super::server::ExtensionServer;

impl ExtensionServer {
    /// Add an SDS certificate reference for every attached policy to each TLS
    /// filter chain of the listener.
    ///
    /// Failures are per filter chain: the chain is logged and left as it was,
    /// the rest of the listener is still modified and returned.
    pub fn modify_listener(
        &self,
        request: PostHttpListenerModifyRequest,
    ) -> PostHttpListenerModifyResponse {
        let PostHttpListenerModifyRequest {
            mut listener,
            post_listener_context,
        } = request;

        let resources = post_listener_context
            .map(|ctx| ctx.extension_resources)
            .unwrap_or_default();
        let policies = extract_policies(&resources);

        info!(
            listener = listener.as_ref().map(|l| l.name.as_str()).unwrap_or_default(),
            policies = policies.len(),
            "PostHTTPListenerModify callback was invoked"
        );

        if let Some(listener) = listener.as_mut() {
            for filter_chain in &mut listener.filter_chains {
                match inject_sds_secret_configs(filter_chain.transport_socket.as_mut(), &policies)
                {
                    Ok(true) => debug!(
                        filter_chain = %filter_chain.name,
                        count = policies.len(),
                        "Appended SDS secret configs to tls_certificate_sds_secret_configs"
                    ),
                    Ok(false) => debug!(
                        filter_chain = %filter_chain.name,
                        "Filter chain has no TLS transport socket"
                    ),
                    Err(e) => error!(
                        filter_chain = %filter_chain.name,
                        error = %e,
                        "Failed to apply CertificatePolicies to filter chain"
                    ),
                }
            }
        }

        PostHttpListenerModifyResponse { listener }
    }
}

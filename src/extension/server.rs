use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tonic::{Request, Response, Status};
use tracing::info;

use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::policy::PolicyStore;

use super::proto::{
    PostHttpListenerModifyRequest, PostHttpListenerModifyResponse, PostTranslateModifyRequest,
    PostTranslateModifyResponse,
};
use super::service::{EnvoyGatewayExtension, EnvoyGatewayExtensionServer};

/// Where the translation hook gets its CertificatePolicies from
pub enum TranslationPolicies {
    /// Policies Envoy Gateway attached to the translation request
    Attached,
    /// Every policy in the store, regardless of what the request carries
    Listed(Arc<dyn PolicyStore>),
}

/// The extension hooks, with their backing stores injected at construction
pub struct ExtensionServer {
    pub(super) credentials: Arc<dyn CredentialStore>,
    pub(super) translation_policies: TranslationPolicies,
}

impl ExtensionServer {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        translation_policies: TranslationPolicies,
    ) -> Self {
        Self {
            credentials,
            translation_policies,
        }
    }

    /// Serve the extension hooks over TCP until `shutdown` resolves
    pub async fn run(
        self,
        addr: &str,
        shutdown: impl std::future::Future<Output = ()>,
    ) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let incoming = TcpListenerStream::new(listener);

        info!(%local_addr, "Extension server listening");

        Server::builder()
            .add_service(EnvoyGatewayExtensionServer::new(self))
            .serve_with_incoming_shutdown(incoming, shutdown)
            .await?;

        Ok(())
    }
}

#[tonic::async_trait]
impl EnvoyGatewayExtension for ExtensionServer {
    async fn post_http_listener_modify(
        &self,
        request: Request<PostHttpListenerModifyRequest>,
    ) -> std::result::Result<Response<PostHttpListenerModifyResponse>, Status> {
        Ok(Response::new(self.modify_listener(request.into_inner())))
    }

    async fn post_translate_modify(
        &self,
        request: Request<PostTranslateModifyRequest>,
    ) -> std::result::Result<Response<PostTranslateModifyResponse>, Status> {
        Ok(Response::new(
            self.modify_translation(request.into_inner()).await,
        ))
    }
}

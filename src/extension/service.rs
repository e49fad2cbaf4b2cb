//! gRPC plumbing for `envoygateway.extension.EnvoyGatewayExtension`.
//!
//! Written out by hand in the shape tonic's codegen produces, since the
//! service's messages embed xds-api types rather than generated ones.
use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use tonic::codec::ProstCodec;
use tonic::codegen::{Body, BoxFuture, Service, StdError, empty_body, http};
use tonic::server::{Grpc, NamedService, UnaryService};
use tonic::{Request, Response, Status};

use super::proto::{
    PostHttpListenerModifyRequest, PostHttpListenerModifyResponse, PostTranslateModifyRequest,
    PostTranslateModifyResponse,
};

pub const SERVICE_NAME: &str = "envoygateway.extension.EnvoyGatewayExtension";

const POST_HTTP_LISTENER_MODIFY: &str =
    "/envoygateway.extension.EnvoyGatewayExtension/PostHTTPListenerModify";
const POST_TRANSLATE_MODIFY: &str =
    "/envoygateway.extension.EnvoyGatewayExtension/PostTranslateModify";

/// Hooks Envoy Gateway calls while translating Gateway API resources
#[tonic::async_trait]
pub trait EnvoyGatewayExtension: Send + Sync + 'static {
    /// Called after a listener has been generated, before it is sent to Envoy
    async fn post_http_listener_modify(
        &self,
        request: Request<PostHttpListenerModifyRequest>,
    ) -> Result<Response<PostHttpListenerModifyResponse>, Status>;

    /// Called once all xDS resources of a translation have been generated
    async fn post_translate_modify(
        &self,
        request: Request<PostTranslateModifyRequest>,
    ) -> Result<Response<PostTranslateModifyResponse>, Status>;
}

#[derive(Debug)]
pub struct EnvoyGatewayExtensionServer<T> {
    inner: Arc<T>,
}

impl<T> EnvoyGatewayExtensionServer<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl<T> Clone for EnvoyGatewayExtensionServer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> NamedService for EnvoyGatewayExtensionServer<T> {
    const NAME: &'static str = SERVICE_NAME;
}

struct PostHttpListenerModifySvc<T>(Arc<T>);

impl<T: EnvoyGatewayExtension> UnaryService<PostHttpListenerModifyRequest>
    for PostHttpListenerModifySvc<T>
{
    type Response = PostHttpListenerModifyResponse;
    type Future = BoxFuture<Response<Self::Response>, Status>;

    fn call(&mut self, request: Request<PostHttpListenerModifyRequest>) -> Self::Future {
        let inner = Arc::clone(&self.0);
        Box::pin(async move { inner.post_http_listener_modify(request).await })
    }
}

struct PostTranslateModifySvc<T>(Arc<T>);

impl<T: EnvoyGatewayExtension> UnaryService<PostTranslateModifyRequest>
    for PostTranslateModifySvc<T>
{
    type Response = PostTranslateModifyResponse;
    type Future = BoxFuture<Response<Self::Response>, Status>;

    fn call(&mut self, request: Request<PostTranslateModifyRequest>) -> Self::Future {
        let inner = Arc::clone(&self.0);
        Box::pin(async move { inner.post_translate_modify(request).await })
    }
}

impl<T, B> Service<http::Request<B>> for EnvoyGatewayExtensionServer<T>
where
    T: EnvoyGatewayExtension,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<tonic::body::BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let inner = Arc::clone(&self.inner);
        match req.uri().path() {
            POST_HTTP_LISTENER_MODIFY => Box::pin(async move {
                let mut grpc = Grpc::new(ProstCodec::default());
                Ok(grpc.unary(PostHttpListenerModifySvc(inner), req).await)
            }),
            POST_TRANSLATE_MODIFY => Box::pin(async move {
                let mut grpc = Grpc::new(ProstCodec::default());
                Ok(grpc.unary(PostTranslateModifySvc(inner), req).await)
            }),
            // PostRouteModify, PostVirtualHostModify and any future hooks
            _ => Box::pin(async move { Ok(unimplemented_response()) }),
        }
    }
}

fn unimplemented_response() -> http::Response<tonic::body::BoxBody> {
    let mut response = http::Response::new(empty_body());
    let headers = response.headers_mut();
    headers.insert(
        http::HeaderName::from_static("grpc-status"),
        http::HeaderValue::from(tonic::Code::Unimplemented as i32),
    );
    headers.insert(
        http::header::CONTENT_TYPE,
        http::HeaderValue::from_static("application/grpc"),
    );
    response
}

//! Messages of the Envoy Gateway extension service (`envoygateway.extension`).
//!
//! Only the hooks this server implements are modelled. Envoy resources are
//! the xds-api types, so they encode exactly as Envoy Gateway sends them.
use xds_api::pb::envoy::config::cluster::v3::Cluster;
use xds_api::pb::envoy::config::listener::v3::Listener;
use xds_api::pb::envoy::config::route::v3::RouteConfiguration;
use xds_api::pb::envoy::extensions::transport_sockets::tls::v3::Secret;

/// A policy resource attached to the translated object, as raw JSON
#[derive(Clone, PartialEq, prost::Message)]
pub struct ExtensionResource {
    #[prost(bytes = "vec", tag = "1")]
    pub unstructured_bytes: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostHttpListenerExtensionContext {
    #[prost(message, repeated, tag = "1")]
    pub extension_resources: Vec<ExtensionResource>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostTranslateExtensionContext {
    #[prost(message, repeated, tag = "1")]
    pub extension_resources: Vec<ExtensionResource>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostHttpListenerModifyRequest {
    #[prost(message, optional, tag = "1")]
    pub listener: Option<Listener>,
    #[prost(message, optional, tag = "2")]
    pub post_listener_context: Option<PostHttpListenerExtensionContext>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostHttpListenerModifyResponse {
    #[prost(message, optional, tag = "1")]
    pub listener: Option<Listener>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostTranslateModifyRequest {
    #[prost(message, optional, tag = "1")]
    pub post_translate_context: Option<PostTranslateExtensionContext>,
    #[prost(message, repeated, tag = "2")]
    pub clusters: Vec<Cluster>,
    #[prost(message, repeated, tag = "3")]
    pub secrets: Vec<Secret>,
    #[prost(message, repeated, tag = "4")]
    pub listeners: Vec<Listener>,
    #[prost(message, repeated, tag = "5")]
    pub routes: Vec<RouteConfiguration>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostTranslateModifyResponse {
    #[prost(message, repeated, tag = "1")]
    pub clusters: Vec<Cluster>,
    #[prost(message, repeated, tag = "2")]
    pub secrets: Vec<Secret>,
    #[prost(message, repeated, tag = "3")]
    pub listeners: Vec<Listener>,
    #[prost(message, repeated, tag = "4")]
    pub routes: Vec<RouteConfiguration>,
}

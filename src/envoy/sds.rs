use xds_api::pb::envoy::config::core::v3::config_source::ConfigSourceSpecifier;
use xds_api::pb::envoy::config::core::v3::{AggregatedConfigSource, ApiVersion, ConfigSource};
use xds_api::pb::envoy::extensions::transport_sockets::tls::v3::SdsSecretConfig;

/// Build an SDS reference to `name`, resolved over the ADS stream
pub fn build_sds_secret_config(name: &str) -> SdsSecretConfig {
    SdsSecretConfig {
        name: name.to_string(),
        sds_config: Some(ConfigSource {
            resource_api_version: ApiVersion::V3 as i32,
            config_source_specifier: Some(ConfigSourceSpecifier::Ads(
                AggregatedConfigSource::default(),
            )),
            ..Default::default()
        }),
    }
}

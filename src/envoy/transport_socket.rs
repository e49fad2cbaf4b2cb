use xds_api::pb::envoy::config::core::v3::TransportSocket;
use xds_api::pb::envoy::config::core::v3::transport_socket::ConfigType;

use crate::error::Result;
use crate::policy::CertificatePolicy;

use super::sds::build_sds_secret_config;
use super::tls::DownstreamTlsContext;

/// Point a downstream TLS transport socket at the policies' secrets via SDS
///
/// Returns `Ok(false)` without touching anything when there is no socket or
/// the socket carries no typed config. Otherwise one SDS reference per policy
/// is appended to `tls_certificate_sds_secret_configs` and the typed config is
/// replaced with the re-encoded context. Existing references are kept, and
/// applying the same policies twice appends them twice.
pub fn inject_sds_secret_configs(
    transport_socket: Option<&mut TransportSocket>,
    policies: &[CertificatePolicy],
) -> Result<bool> {
    let Some(ConfigType::TypedConfig(typed_config)) =
        transport_socket.and_then(|socket| socket.config_type.as_mut())
    else {
        return Ok(false);
    };

    let mut tls_context = DownstreamTlsContext::from_any(typed_config)?;
    append_sds_secret_configs(&mut tls_context, policies);
    *typed_config = tls_context.to_any();

    Ok(true)
}

/// Append one SDS reference per policy, creating the common TLS context if needed
pub fn append_sds_secret_configs(
    tls_context: &mut DownstreamTlsContext,
    policies: &[CertificatePolicy],
) {
    let configs = &mut tls_context
        .common_tls_context_mut()
        .tls_certificate_sds_secret_configs;
    configs.extend(
        policies
            .iter()
            .map(|policy| build_sds_secret_config(policy.secret_name())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envoy::CommonTlsContext;
    use crate::error::Error;
    use crate::testing::{policy, tls_transport_socket};
    use xds_api::pb::google::protobuf::Any;

    fn sds_names(socket: &TransportSocket) -> Vec<String> {
        let Some(ConfigType::TypedConfig(any)) = &socket.config_type else {
            panic!("transport socket lost its typed config");
        };
        DownstreamTlsContext::from_any(any)
            .unwrap()
            .common_tls_context
            .map(|c| {
                c.tls_certificate_sds_secret_configs
                    .into_iter()
                    .map(|s| s.name)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_missing_transport_socket_is_noop() {
        let policies = vec![policy("default", "secret-1")];
        assert!(!inject_sds_secret_configs(None, &policies).unwrap());
    }

    #[test]
    fn test_socket_without_typed_config_is_noop() {
        let mut socket = TransportSocket {
            name: "envoy.transport_sockets.tls".to_string(),
            config_type: None,
        };
        let before = socket.clone();

        let policies = vec![policy("default", "secret-1")];
        assert!(!inject_sds_secret_configs(Some(&mut socket), &policies).unwrap());
        assert_eq!(socket, before);
    }

    #[test]
    fn test_appends_one_config_per_policy_in_order() {
        let mut socket = tls_transport_socket(DownstreamTlsContext::default());
        let policies = vec![
            policy("default", "secret-1"),
            policy("default", "secret-2"),
            policy("default", "secret-3"),
        ];

        assert!(inject_sds_secret_configs(Some(&mut socket), &policies).unwrap());
        assert_eq!(sds_names(&socket), ["secret-1", "secret-2", "secret-3"]);
        assert_eq!(socket.name, "envoy.transport_sockets.tls");
    }

    #[test]
    fn test_reapplying_appends_duplicates() {
        let mut socket = tls_transport_socket(DownstreamTlsContext::default());
        let policies = vec![policy("default", "secret-1"), policy("default", "secret-2")];

        inject_sds_secret_configs(Some(&mut socket), &policies).unwrap();
        inject_sds_secret_configs(Some(&mut socket), &policies).unwrap();

        assert_eq!(
            sds_names(&socket),
            ["secret-1", "secret-2", "secret-1", "secret-2"]
        );
    }

    #[test]
    fn test_existing_configs_are_kept_first() {
        let mut context = DownstreamTlsContext::default();
        append_sds_secret_configs(&mut context, &[policy("default", "existing-secret")]);
        let mut socket = tls_transport_socket(context);

        inject_sds_secret_configs(Some(&mut socket), &[policy("default", "new-secret")]).unwrap();
        assert_eq!(sds_names(&socket), ["existing-secret", "new-secret"]);
    }

    #[test]
    fn test_empty_policies_still_create_common_context() {
        let mut context = DownstreamTlsContext::default();
        append_sds_secret_configs(&mut context, &[]);
        assert_eq!(context.common_tls_context, Some(CommonTlsContext::default()));
    }

    #[test]
    fn test_invalid_typed_config_is_an_error() {
        let mut socket = TransportSocket {
            name: "envoy.transport_sockets.tls".to_string(),
            config_type: Some(ConfigType::TypedConfig(Any {
                type_url: "type.googleapis.com/envoy.config.core.v3.Node".to_string(),
                value: Vec::new(),
            })),
        };
        let before = socket.clone();

        let err = inject_sds_secret_configs(Some(&mut socket), &[policy("default", "s")]);
        assert!(matches!(err, Err(Error::UnexpectedTypeUrl { .. })));
        assert_eq!(socket, before);
    }
}

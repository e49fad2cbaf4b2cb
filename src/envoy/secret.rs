use xds_api::pb::envoy::config::core::v3::DataSource;
use xds_api::pb::envoy::config::core::v3::data_source::Specifier;
use xds_api::pb::envoy::extensions::transport_sockets::tls::v3::{
    Secret, TlsCertificate, secret::Type as SecretType,
};

/// Build a TLS secret carrying the certificate chain and key inline
pub fn build_tls_secret(name: &str, cert_chain: Vec<u8>, private_key: Vec<u8>) -> Secret {
    Secret {
        name: name.to_string(),
        r#type: Some(SecretType::TlsCertificate(TlsCertificate {
            certificate_chain: Some(inline_bytes(cert_chain)),
            private_key: Some(inline_bytes(private_key)),
            ..Default::default()
        })),
    }
}

fn inline_bytes(bytes: Vec<u8>) -> DataSource {
    DataSource {
        specifier: Some(Specifier::InlineBytes(bytes)),
        watched_directory: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tls_secret_is_inline() {
        let secret = build_tls_secret("infra/wildcard-tls", b"chain".to_vec(), b"key".to_vec());
        assert_eq!(secret.name, "infra/wildcard-tls");

        let Some(SecretType::TlsCertificate(cert)) = secret.r#type else {
            panic!("expected a TLS certificate secret");
        };
        assert_eq!(
            cert.certificate_chain.and_then(|d| d.specifier),
            Some(Specifier::InlineBytes(b"chain".to_vec()))
        );
        assert_eq!(
            cert.private_key.and_then(|d| d.specifier),
            Some(Specifier::InlineBytes(b"key".to_vec()))
        );
    }
}

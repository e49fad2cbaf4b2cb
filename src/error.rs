use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Malformed TLS context: {0}")]
    TlsContext(String),

    #[error("Unexpected typed config: expected {expected}, found {found}")]
    UnexpectedTypeUrl {
        expected: &'static str,
        found: String,
    },

    #[error("Not a CertificatePolicy: apiVersion {api_version:?}, kind {kind:?}")]
    UnexpectedKind { api_version: String, kind: String },

    #[error("CertificatePolicy {namespace}/{name} has an empty secretName")]
    EmptySecretName { namespace: String, name: String },

    #[error("Invalid {field} {value:?}")]
    InvalidName { field: &'static str, value: String },

    #[error("Secret {namespace}/{name} not found")]
    CredentialNotFound { namespace: String, name: String },

    #[error("Secret {namespace}/{name} missing {field} key")]
    MissingCredentialField {
        namespace: String,
        name: String,
        field: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

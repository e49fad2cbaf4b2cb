mod extract;
mod store;
mod types;

pub use extract::extract_policies;
pub use store::{KubernetesPolicyStore, PolicyStore};
pub use types::CertificatePolicy;
#[cfg(test)]
pub use types::{CertificatePolicySpec, PolicyMetadata};

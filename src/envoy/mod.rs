mod sds;
mod secret;
mod tls;
mod transport_socket;

pub use secret::build_tls_secret;
#[cfg(test)]
pub use tls::{CommonTlsContext, DownstreamTlsContext};
pub use transport_socket::inject_sds_secret_configs;

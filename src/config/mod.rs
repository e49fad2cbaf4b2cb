mod loader;
mod types;

pub use loader::load_config;
pub use types::{Config, CredentialBackend, PolicySource};

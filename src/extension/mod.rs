mod listener;
mod proto;
mod server;
mod service;
mod translate;

pub use proto::ExtensionResource;
pub use server::{ExtensionServer, TranslationPolicies};

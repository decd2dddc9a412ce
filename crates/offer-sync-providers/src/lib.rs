pub mod client;
mod lenient;
pub mod offer1;
pub mod offer2;
pub mod registry;

pub use client::JsonClient;
pub use offer1::Offer1Provider;
pub use offer2::Offer2Provider;
pub use registry::{Provider, ProviderConfig, ProviderKind, build_providers};

use offer_sync::{FetchError, Offer, OfferProvider};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::offer1::Offer1Provider;
use crate::offer2::Offer2Provider;

/// One entry of the static provider list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub name: String,
    pub base_url: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl ProviderConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Every provider this build knows how to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Offer1,
    Offer2,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::Offer1, ProviderKind::Offer2];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            Offer1Provider::NAME => Some(Self::Offer1),
            Offer2Provider::NAME => Some(Self::Offer2),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Offer1 => Offer1Provider::NAME,
            Self::Offer2 => Offer2Provider::NAME,
        }
    }

    pub fn default_url(&self) -> &'static str {
        match self {
            Self::Offer1 => Offer1Provider::DEFAULT_URL,
            Self::Offer2 => Offer2Provider::DEFAULT_URL,
        }
    }

    /// Environment variable that overrides this provider's base URL.
    pub fn url_env_key(&self) -> &'static str {
        match self {
            Self::Offer1 => "OFFER1_API_URL",
            Self::Offer2 => "OFFER2_API_URL",
        }
    }

    pub fn build(&self, base_url: &str) -> Provider {
        match self {
            Self::Offer1 => Provider::Offer1(Offer1Provider::new(base_url)),
            Self::Offer2 => Provider::Offer2(Offer2Provider::new(base_url)),
        }
    }
}

/// A constructed provider adapter.
pub enum Provider {
    Offer1(Offer1Provider),
    Offer2(Offer2Provider),
}

impl Provider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::Offer1(_) => ProviderKind::Offer1,
            Self::Offer2(_) => ProviderKind::Offer2,
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            Self::Offer1(p) => p.base_url(),
            Self::Offer2(p) => p.base_url(),
        }
    }
}

#[async_trait::async_trait]
impl OfferProvider for Provider {
    fn provider_name(&self) -> &str {
        self.kind().name()
    }

    async fn fetch(&self) -> Result<serde_json::Value, FetchError> {
        match self {
            Self::Offer1(p) => p.fetch().await,
            Self::Offer2(p) => p.fetch().await,
        }
    }

    fn transform(&self, payload: &serde_json::Value) -> Vec<Offer> {
        match self {
            Self::Offer1(p) => p.transform(payload),
            Self::Offer2(p) => p.transform(payload),
        }
    }
}

/// Construct adapters for every enabled, recognised entry, in list order.
///
/// Disabled entries are skipped before construction; unrecognised names are
/// skipped with a warning.
pub fn build_providers(configs: &[ProviderConfig]) -> Vec<Provider> {
    let mut providers = Vec::with_capacity(configs.len());

    for config in configs {
        if !config.enabled {
            info!(provider = %config.name, "Skipping disabled provider");
            continue;
        }

        match ProviderKind::from_name(&config.name) {
            Some(kind) => providers.push(kind.build(&config.base_url)),
            None => warn!(provider = %config.name, "Unknown provider, skipping"),
        }
    }

    providers
}

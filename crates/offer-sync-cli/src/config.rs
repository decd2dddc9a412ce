use std::path::PathBuf;

use offer_sync_providers::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

/// Built-in provider list, with base URLs taken from the environment when set.
pub fn default_providers() -> Vec<ProviderConfig> {
    default_providers_from(|key| std::env::var(key).ok())
}

fn default_providers_from(lookup: impl Fn(&str) -> Option<String>) -> Vec<ProviderConfig> {
    ProviderKind::ALL
        .iter()
        .map(|kind| {
            let base_url = lookup(kind.url_env_key())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| kind.default_url().to_owned());
            ProviderConfig::new(kind.name(), base_url)
        })
        .collect()
}

/// Config file path: `~/.config/offer-sync/providers.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("offer-sync").join("providers.toml"))
}

/// Load config from file, falling back to defaults if missing.
pub fn load_config() -> AppConfig {
    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            return config;
        }
        tracing::warn!(
            path = %path.display(),
            "Failed to parse provider config, using defaults"
        );
    }

    AppConfig {
        providers: default_providers(),
    }
}

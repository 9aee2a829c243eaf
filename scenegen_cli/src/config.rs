//! Layered configuration for the scenegen CLI
//!
//! Configuration is resolved in three layers: built-in defaults, an optional
//! TOML file, and `SCENEGEN_`-prefixed environment variables (nested keys
//! separated with `__`, e.g. `SCENEGEN_PROVIDER__API_KEY`).

use crate::paths;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheSettings,

    #[serde(default)]
    pub provider: ProviderSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CacheSettings {
    /// Cache directory; defaults to the XDG cache location
    pub dir: Option<PathBuf>,
    /// Default TTL for cached images, in days
    pub default_ttl_days: u64,
    /// Disable to skip caching entirely
    pub enabled: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ProviderSettings {
    /// Base URL of the OpenAI-compatible image endpoint
    pub base_url: String,
    /// Model name sent with each generation request
    pub model: String,
    /// API key; usually supplied via SCENEGEN_PROVIDER__API_KEY
    pub api_key: Option<String>,
    /// Prompt style template with a `{query}` placeholder
    pub style_template: Option<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: None,
            default_ttl_days: 30,
            enabled: true,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "dall-e-3".to_string(),
            api_key: None,
            style_template: None,
        }
    }
}

impl CacheSettings {
    /// Resolved cache directory
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(paths::get_cache_dir)
    }

    /// Default TTL as a duration
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_days * 86400)
    }
}

/// Load configuration from defaults, the config file, and the environment
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = config_path.unwrap_or_else(paths::get_config_path);

    let mut figment = Figment::new();

    // Layer 1: Defaults
    figment = figment.merge(Serialized::defaults(AppConfig::default()));

    // Layer 2: Config file (if exists)
    if config_path.exists() {
        figment = figment.merge(Toml::file(&config_path));
    }

    // Layer 3: Environment variables
    figment = figment.merge(Env::prefixed("SCENEGEN_").split("__"));

    figment.extract().context("Failed to load configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.default_ttl_days, 30);
        assert_eq!(config.provider.base_url, "https://api.openai.com/v1");
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn test_default_ttl_conversion() {
        let settings = CacheSettings {
            default_ttl_days: 2,
            ..CacheSettings::default()
        };
        assert_eq!(settings.default_ttl(), Duration::from_secs(2 * 86400));
    }

    #[test]
    fn test_config_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [cache]
                default_ttl_days = 7
                enabled = false

                [provider]
                model = "dall-e-2"
                "#,
            )?;

            let config = load_config(Some(PathBuf::from("config.toml"))).unwrap();
            assert_eq!(config.cache.default_ttl_days, 7);
            assert!(!config.cache.enabled);
            assert_eq!(config.provider.model, "dall-e-2");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_config_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [provider]
                model = "dall-e-2"
                "#,
            )?;
            jail.set_env("SCENEGEN_PROVIDER__API_KEY", "sk-test");
            jail.set_env("SCENEGEN_PROVIDER__MODEL", "dall-e-3");

            let config = load_config(Some(PathBuf::from("config.toml"))).unwrap();
            assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
            assert_eq!(config.provider.model, "dall-e-3");
            Ok(())
        });
    }
}

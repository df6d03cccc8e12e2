// Configuration loader
// Loads settings from ~/.acolhe/config.toml, with GEMINI_API_KEY as a fallback

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::settings::{Config, ProviderEntry};
use crate::errors::config_parse_error;

/// Load configuration from the acolhe config file or environment.
///
/// Missing configuration is not an error: the companion then runs local-only.
pub fn load_config() -> Result<Config> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let config_path = home.join(".acolhe/config.toml");

    let mut config = if config_path.exists() {
        load_config_from(&config_path)?
    } else {
        Config::default()
    };

    apply_env_fallback(&mut config, std::env::var("GEMINI_API_KEY").ok());

    if config.has_remote() {
        tracing::info!(
            "Remote generation enabled ({} provider(s))",
            config.providers.len()
        );
    } else {
        tracing::info!("No API key configured, using local responses only");
    }

    Ok(config)
}

/// Parse a config file at an explicit path
pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!(config_parse_error(&e.to_string())))?;

    for entry in &config.providers {
        if entry.api_key.trim().is_empty() {
            anyhow::bail!(crate::errors::api_key_missing_error(&entry.provider));
        }
    }

    Ok(config)
}

/// Use an API key from the environment when the file configures no provider
fn apply_env_fallback(config: &mut Config, env_key: Option<String>) {
    if config.has_remote() {
        return;
    }
    if let Some(api_key) = env_key.filter(|k| !k.trim().is_empty()) {
        config.providers.push(ProviderEntry {
            provider: "gemini".to_string(),
            api_key,
            model: None,
            base_url: None,
            name: Some("Gemini (Environment)".to_string()),
        });
    }
}

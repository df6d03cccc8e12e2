// Provider factory
//
// Creates LLM providers based on configuration

use anyhow::{bail, Result};

use super::chain::ProviderChain;
use super::claude::ClaudeProvider;
use super::gemini::GeminiProvider;
use super::LlmProvider;
use crate::config::ProviderEntry;

/// Create a single provider, or a chain in config order when several are configured
pub fn create_provider(entries: &[ProviderEntry]) -> Result<Box<dyn LlmProvider>> {
    match entries {
        [] => bail!("No remote providers configured"),
        [single] => create_single(single),
        many => {
            let providers = many
                .iter()
                .map(create_single)
                .collect::<Result<Vec<_>>>()?;
            tracing::info!("Created provider chain with {} providers", providers.len());
            Ok(Box::new(ProviderChain::new(providers)?))
        }
    }
}

fn create_single(entry: &ProviderEntry) -> Result<Box<dyn LlmProvider>> {
    match entry.provider.as_str() {
        "gemini" => {
            let mut provider = GeminiProvider::new(entry.api_key.clone())?;
            if let Some(model) = &entry.model {
                provider = provider.with_model(model.clone());
            }
            if let Some(base_url) = &entry.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Box::new(provider))
        }

        "claude" => {
            let mut provider = ClaudeProvider::new(entry.api_key.clone())?;
            if let Some(model) = &entry.model {
                provider = provider.with_model(model.clone());
            }
            if let Some(base_url) = &entry.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(Box::new(provider))
        }

        other => bail!("Unknown provider: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(provider: &str, model: Option<&str>) -> ProviderEntry {
        ProviderEntry {
            provider: provider.to_string(),
            api_key: "test-key".to_string(),
            model: model.map(|m| m.to_string()),
            base_url: None,
            name: None,
        }
    }

    #[test]
    fn test_create_gemini_provider() {
        let provider = create_provider(&[entry("gemini", Some("gemini-1.5-pro"))]).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.default_model(), "gemini-1.5-pro");
    }

    #[test]
    fn test_create_claude_provider() {
        let provider = create_provider(&[entry("claude", None)]).unwrap();
        assert_eq!(provider.name(), "claude");
    }

    #[test]
    fn test_multiple_entries_build_chain_led_by_first() {
        let provider =
            create_provider(&[entry("claude", Some("claude-x")), entry("gemini", None)]).unwrap();
        assert_eq!(provider.name(), "claude");
        assert_eq!(provider.default_model(), "claude-x");
    }

    #[test]
    fn test_unknown_provider() {
        assert!(create_provider(&[entry("unknown", None)]).is_err());
        assert!(create_provider(&[]).is_err());
    }
}

// Configuration structs

use crate::generators::GenerationTuning;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One remote LLM backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// "gemini" or "claude"
    pub provider: String,
    pub api_key: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrisisConfig {
    /// Wait before the automatic call is placed
    pub auto_dial_delay_ms: u64,
    /// Command used to place calls, `{phone}` is replaced by the number
    pub dial_command: Option<String>,
}

impl Default for CrisisConfig {
    fn default() -> Self {
        Self {
            auto_dial_delay_ms: 3000,
            dial_command: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub debug_logging: bool,
    /// Append per-turn metrics to <data_dir>/metrics
    pub metrics: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            debug_logging: false,
            metrics: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote backends in priority order; empty = local-only
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,

    #[serde(default)]
    pub crisis: CrisisConfig,

    #[serde(default)]
    pub features: FeatureFlags,

    #[serde(default)]
    pub generation: GenerationTuning,

    /// Optional JSON file overriding the built-in lexicon
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    /// Where the store, metrics and logs live
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

pub(crate) fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".acolhe"))
        .unwrap_or_else(|| PathBuf::from(".acolhe"))
}

impl Config {
    pub fn new(providers: Vec<ProviderEntry>) -> Self {
        Self {
            providers,
            crisis: CrisisConfig::default(),
            features: FeatureFlags::default(),
            generation: GenerationTuning::default(),
            lexicon_path: None,
            data_dir: default_data_dir(),
        }
    }

    /// Whether remote generation is enabled
    pub fn has_remote(&self) -> bool {
        !self.providers.is_empty()
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    pub fn metrics_dir(&self) -> PathBuf {
        self.data_dir.join("metrics")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

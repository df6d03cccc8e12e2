// Remote LLM provider support
//
// The companion works fully offline; a provider is only used when an API key
// is configured. Gemini is the default backend, Claude is also supported.

use anyhow::Result;
use async_trait::async_trait;

pub mod types;

// Provider implementations
pub mod claude;
pub mod gemini;

pub mod chain;
pub mod factory;

// Re-export commonly used types
pub use claude::ClaudeProvider;
pub use chain::ProviderChain;
pub use factory::create_provider;
pub use gemini::GeminiProvider;
pub use types::{Message, ProviderRequest, ProviderResponse, Role};

/// Trait for LLM providers
///
/// Implementations send one non-streaming request and return the complete
/// response, or an error for network, auth and quota failures alike.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a message and get a complete response
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse>;

    /// Get the provider name (e.g., "gemini", "claude")
    fn name(&self) -> &str;

    /// Get the default model for this provider
    fn default_model(&self) -> &str;
}

/// Pick the model for a request: explicit request model, else the provider default
pub(crate) fn resolve_model(request: &ProviderRequest, default_model: &str) -> String {
    if request.model.is_empty() {
        default_model.to_string()
    } else {
        request.model.clone()
    }
}

// Unified request/response types for remote LLM providers
//
// Each provider maps these onto its own wire format.

use serde::{Deserialize, Serialize};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            content: content.into(),
        }
    }
}

/// Unified request format for all LLM providers
#[derive(Debug, Clone, Serialize)]
pub struct ProviderRequest {
    /// System instruction, sent out-of-band where the provider supports it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Conversation turns, oldest first
    pub messages: Vec<Message>,

    /// Model name (provider-specific, empty = provider default)
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature (0.0 to 1.0, optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ProviderRequest {
    /// Create a new request from messages
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            system: None,
            messages,
            model: String::new(), // Will be set by provider
            max_tokens: 1024,
            temperature: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Unified response format from LLM providers
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderResponse {
    /// Model that generated the response
    pub model: String,

    /// Generated text, concatenated across parts
    pub text: String,

    /// Why the model stopped generating
    pub stop_reason: Option<String>,

    /// Provider name (e.g., "gemini", "claude")
    pub provider: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = ProviderRequest::new(vec![Message::user("oi")])
            .with_system("seja gentil")
            .with_model("gemini-2.0-flash")
            .with_max_tokens(256)
            .with_temperature(0.7);

        assert_eq!(request.system.as_deref(), Some("seja gentil"));
        assert_eq!(request.model, "gemini-2.0-flash");
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.messages[0].role, Role::User);
    }
}

// Local device storage
//
// The companion talks to profile, settings and chat-history storage through
// the traits below. LocalStore is the bundled implementation: one JSON
// snapshot, optionally persisted to disk.

mod local;
mod voice;

pub use local::LocalStore;
pub use voice::{SilentSpeaker, Speaker};

use crate::approach::Approach;
use crate::crisis::ContactBook;
use crate::insights::UserInsight;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat history is truncated to this many messages
pub const MAX_CHAT_HISTORY: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub show_emergency: bool,
    #[serde(default)]
    pub is_crisis: bool,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            is_user,
            timestamp: Utc::now(),
            show_emergency: false,
            is_crisis: false,
        }
    }

    /// Mark this message as part of a crisis escalation
    pub fn with_crisis_flags(mut self, show_emergency: bool, is_crisis: bool) -> Self {
        self.show_emergency = show_emergency;
        self.is_crisis = is_crisis;
        self
    }
}

/// Drop the oldest messages beyond MAX_CHAT_HISTORY
pub fn truncate_history(history: &mut Vec<ChatMessage>) {
    if history.len() > MAX_CHAT_HISTORY {
        let overflow = history.len() - MAX_CHAT_HISTORY;
        history.drain(..overflow);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivacySettings {
    pub save_history: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self { save_history: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub therapeutic_approach: Approach,
    pub voice: VoiceSettings,
    pub privacy: PrivacySettings,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self) -> Result<UserProfile>;
    async fn save_profile(&self, profile: UserProfile) -> Result<()>;
    async fn get_insights(&self) -> Result<Vec<UserInsight>>;
    /// Append an insight; only the most recent ones are kept
    async fn add_insight(&self, text: &str) -> Result<UserInsight>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_settings(&self) -> Result<Settings>;
    async fn save_settings(&self, settings: Settings) -> Result<()>;
}

#[async_trait]
pub trait ChatHistoryStore: Send + Sync {
    /// Most recent `limit` messages, oldest first
    async fn get_chat_history(&self, limit: usize) -> Result<Vec<ChatMessage>>;
    async fn add_chat_message(&self, message: ChatMessage) -> Result<()>;
    async fn clear_chat_history(&self) -> Result<()>;
}

#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Permanent contacts plus the user's personal ones
    async fn get_emergency_contacts(&self) -> Result<ContactBook>;
    async fn save_emergency_contacts(&self, book: &ContactBook) -> Result<()>;
}

/// Everything the companion needs from storage
pub trait CompanionStore: ProfileStore + SettingsStore + ChatHistoryStore + ContactStore {}

impl<T: ProfileStore + SettingsStore + ChatHistoryStore + ContactStore> CompanionStore for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_history_keeps_newest() {
        let mut history: Vec<ChatMessage> = (0..MAX_CHAT_HISTORY + 5)
            .map(|i| ChatMessage::new(i.to_string(), true))
            .collect();

        truncate_history(&mut history);
        assert_eq!(history.len(), MAX_CHAT_HISTORY);
        assert_eq!(history[0].text, "5");
    }

    #[test]
    fn test_settings_wire_format() {
        let settings: Settings = serde_json::from_str(
            r#"{"therapeuticApproach": "mindfulness", "voice": {"enabled": true}}"#,
        )
        .unwrap();

        assert_eq!(settings.therapeutic_approach, Approach::Mindfulness);
        assert!(settings.voice.enabled);
        assert!(settings.privacy.save_history);
    }
}

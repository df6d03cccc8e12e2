// JSON-file backed store
//
// The whole state lives in one snapshot behind a tokio RwLock. Every write
// rewrites the file when a path is set; in-memory stores never touch disk.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::{
    truncate_history, ChatHistoryStore, ChatMessage, ContactStore, ProfileStore, Settings,
    SettingsStore, UserProfile,
};
use crate::crisis::ContactBook;
use crate::insights::{InsightLog, UserInsight};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Snapshot {
    profile: UserProfile,
    insights: InsightLog,
    settings: Settings,
    chat_history: Vec<ChatMessage>,
    emergency_contacts: ContactBook,
}

pub struct LocalStore {
    path: Option<PathBuf>,
    state: RwLock<Snapshot>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(Snapshot::default()),
        }
    }

    /// Load the store from `path`, starting empty when the file is missing
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let snapshot = if path.exists() {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read store file: {}", path.display()))?;
            let mut snapshot: Snapshot = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse store file: {}", path.display()))?;
            truncate_history(&mut snapshot.chat_history);
            tracing::info!(
                "Loaded store from {} ({} messages)",
                path.display(),
                snapshot.chat_history.len()
            );
            snapshot
        } else {
            Snapshot::default()
        };

        Ok(Self {
            path: Some(path),
            state: RwLock::new(snapshot),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(snapshot).context("Failed to serialize store")?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write store file: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to replace store file: {}", path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for LocalStore {
    async fn get_profile(&self) -> Result<UserProfile> {
        Ok(self.state.read().await.profile.clone())
    }

    async fn save_profile(&self, profile: UserProfile) -> Result<()> {
        let mut state = self.state.write().await;
        state.profile = profile;
        self.persist(&state).await
    }

    async fn get_insights(&self) -> Result<Vec<UserInsight>> {
        Ok(self.state.read().await.insights.entries().to_vec())
    }

    async fn add_insight(&self, text: &str) -> Result<UserInsight> {
        let insight = UserInsight::new(text);
        let mut state = self.state.write().await;
        state.insights.push(insight.clone());
        self.persist(&state).await?;
        Ok(insight)
    }
}

#[async_trait]
impl SettingsStore for LocalStore {
    async fn get_settings(&self) -> Result<Settings> {
        Ok(self.state.read().await.settings.clone())
    }

    async fn save_settings(&self, settings: Settings) -> Result<()> {
        let mut state = self.state.write().await;
        state.settings = settings;
        self.persist(&state).await
    }
}

#[async_trait]
impl ChatHistoryStore for LocalStore {
    async fn get_chat_history(&self, limit: usize) -> Result<Vec<ChatMessage>> {
        let state = self.state.read().await;
        let start = state.chat_history.len().saturating_sub(limit);
        Ok(state.chat_history[start..].to_vec())
    }

    async fn add_chat_message(&self, message: ChatMessage) -> Result<()> {
        let mut state = self.state.write().await;
        state.chat_history.push(message);
        truncate_history(&mut state.chat_history);
        self.persist(&state).await
    }

    async fn clear_chat_history(&self) -> Result<()> {
        let mut state = self.state.write().await;
        state.chat_history.clear();
        self.persist(&state).await
    }
}

#[async_trait]
impl ContactStore for LocalStore {
    async fn get_emergency_contacts(&self) -> Result<ContactBook> {
        Ok(self.state.read().await.emergency_contacts.clone())
    }

    async fn save_emergency_contacts(&self, book: &ContactBook) -> Result<()> {
        let mut state = self.state.write().await;
        state.emergency_contacts = book.clone();
        self.persist(&state).await
    }
}

// Response generation strategies
//
// LocalGenerator picks canned responses; RemoteGenerator asks an LLM and
// falls back to a LocalGenerator when the call fails. Both sit behind
// ResponseStrategy so the companion does not care which one is active.

mod local;
mod remote;

pub use local::{GenerationTuning, LocalGenerator};
pub use remote::RemoteGenerator;

use crate::approach::Approach;
use crate::insights::UserInsight;
use crate::sentiment::SentimentVerdict;
use crate::store::ChatMessage;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Local,
    Remote,
    Crisis,
}

impl ReplySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplySource::Local => "local",
            ReplySource::Remote => "remote",
            ReplySource::Crisis => "crisis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub text: String,
    pub follow_up: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub show_emergency: bool,
    pub is_crisis: bool,
    pub source: ReplySource,
}

impl Reply {
    pub fn remote(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            follow_up: None,
            suggestions: Vec::new(),
            show_emergency: false,
            is_crisis: false,
            source: ReplySource::Remote,
        }
    }

    pub fn crisis(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            follow_up: None,
            suggestions: Vec::new(),
            show_emergency: true,
            is_crisis: true,
            source: ReplySource::Crisis,
        }
    }
}

/// Everything a strategy needs to answer one user message
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub text: &'a str,
    pub verdict: &'a SentimentVerdict,
    pub approach: Approach,
    /// Prior messages, oldest first, not including `text`
    pub history: &'a [ChatMessage],
    pub insights: &'a [UserInsight],
}

#[async_trait]
pub trait ResponseStrategy: Send + Sync {
    async fn respond(&self, turn: &Turn<'_>) -> Result<Reply>;

    /// Strategy name for logs and metrics
    fn name(&self) -> &str;
}

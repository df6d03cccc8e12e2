// Per-conversation state

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::approach::Approach;
use crate::store::{truncate_history, ChatMessage};

/// State of one conversation. The active approach lives here, so two
/// sessions never see each other's selection.
#[derive(Debug, Clone)]
pub struct ChatSession {
    /// Unique session identifier
    pub id: String,
    /// Therapeutic approach used for generation
    pub approach: Approach,
    history: Vec<ChatMessage>,
    /// Session creation time
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(approach: Approach) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            approach,
            history: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Resume a session with previously stored messages
    pub fn with_history(approach: Approach, mut history: Vec<ChatMessage>) -> Self {
        truncate_history(&mut history);
        Self {
            history,
            ..Self::new(approach)
        }
    }

    /// Messages so far, oldest first
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.history.push(message);
        truncate_history(&mut self.history);
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(Approach::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MAX_CHAT_HISTORY;

    #[test]
    fn test_sessions_have_distinct_ids() {
        assert_ne!(ChatSession::default().id, ChatSession::default().id);
    }

    #[test]
    fn test_push_caps_history() {
        let mut session = ChatSession::new(Approach::Friend);
        for i in 0..MAX_CHAT_HISTORY + 1 {
            session.push(ChatMessage::new(i.to_string(), true));
        }
        assert_eq!(session.len(), MAX_CHAT_HISTORY);
        assert_eq!(session.history()[0].text, "1");
    }

    #[test]
    fn test_with_history_truncates() {
        let history = (0..MAX_CHAT_HISTORY + 10)
            .map(|i| ChatMessage::new(i.to_string(), false))
            .collect();
        let session = ChatSession::with_history(Approach::Cbt, history);
        assert_eq!(session.len(), MAX_CHAT_HISTORY);
        assert_eq!(session.approach, Approach::Cbt);
    }
}

// Durable user insights
//
// Short facts about the user extracted at the end of a session and fed back
// into the remote system prompt on later turns.

mod summarizer;

pub use summarizer::{SessionSummarizer, MIN_MESSAGES_FOR_SUMMARY, NOTHING_RELEVANT_MARKER};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of insights kept per user
pub const MAX_INSIGHTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInsight {
    pub text: String,
    /// Serialized as ISO-8601
    pub timestamp: DateTime<Utc>,
}

impl UserInsight {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only insight list that keeps only the most recent entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsightLog {
    entries: Vec<UserInsight>,
}

impl InsightLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, insight: UserInsight) {
        self.entries.push(insight);
        if self.entries.len() > MAX_INSIGHTS {
            let overflow = self.entries.len() - MAX_INSIGHTS;
            self.entries.drain(..overflow);
        }
    }

    pub fn entries(&self) -> &[UserInsight] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_keeps_last_ten() {
        let mut log = InsightLog::new();
        for i in 0..13 {
            log.push(UserInsight::new(format!("fato {}", i)));
        }

        assert_eq!(log.len(), MAX_INSIGHTS);
        assert_eq!(log.entries()[0].text, "fato 3");
        assert_eq!(log.entries()[9].text, "fato 12");
    }

    #[test]
    fn test_timestamp_serializes_as_iso8601() {
        let insight = UserInsight::new("gosta de correr");
        let json = serde_json::to_value(&insight).unwrap();
        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}

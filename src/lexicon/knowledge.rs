// Per-approach knowledge base

use serde::{Deserialize, Serialize};

/// Canned responses for one approach, selected when the user's text mentions
/// one of its keywords
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub keywords: Vec<String>,
    pub responses: Vec<String>,
    /// Framing prepended to replies for non-general approaches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_prefix: Option<String>,
}

impl KnowledgeBase {
    /// Substring match against already-normalized text
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| normalized.contains(keyword.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_substring_based() {
        let kb = KnowledgeBase {
            keywords: vec!["respira".to_string()],
            responses: vec!["Vamos respirar juntos.".to_string()],
            fallback_prefix: None,
        };

        assert!(kb.matches("não consigo respirar direito"));
        assert!(!kb.matches("tudo certo por aqui"));
    }
}

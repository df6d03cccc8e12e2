// Keyword sentiment classifier

use super::rules::{ClassificationRule, KeywordScan, RULES};
use super::SentimentVerdict;
use crate::lexicon::Lexicon;
use std::sync::Arc;

#[derive(Clone)]
pub struct SentimentClassifier {
    lexicon: Arc<Lexicon>,
}

impl SentimentClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Classify raw user text. Never fails; empty input is neutral.
    pub fn classify(&self, text: &str) -> SentimentVerdict {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return SentimentVerdict::neutral();
        }

        let scan = KeywordScan::scan(&self.lexicon, &normalized);

        for rule in &RULES {
            if let Some(verdict) = (rule.apply)(&scan) {
                if verdict.is_crisis() {
                    let keywords: Vec<&str> =
                        verdict.risks.iter().map(|r| r.keyword.as_str()).collect();
                    tracing::warn!("Crisis detected: high-risk keywords {:?}", keywords);
                } else {
                    tracing::debug!(
                        "Classified by rule {}: {} ({})",
                        rule.tag.as_str(),
                        verdict.level,
                        verdict.score
                    );
                }
                return verdict;
            }
        }

        SentimentVerdict::neutral()
    }

    /// Classify an arbitrary JSON value; anything that is not a string is neutral
    pub fn classify_value(&self, value: &serde_json::Value) -> SentimentVerdict {
        match value.as_str() {
            Some(text) => self.classify(text),
            None => SentimentVerdict::neutral(),
        }
    }

    /// The rules in evaluation order
    pub fn rules() -> &'static [ClassificationRule] {
        &RULES
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::default()))
    }
}

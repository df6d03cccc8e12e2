// Sentiment classification
//
// A single-pass keyword classifier. The crisis tier overrides everything else;
// the remaining tiers are evaluated as an ordered rule list (see rules.rs).

mod classifier;
mod rules;

pub use classifier::SentimentClassifier;
pub use rules::{ClassificationRule, KeywordScan, RuleTag};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLevel {
    Crisis,
    Negative,
    Neutral,
    Positive,
}

impl SentimentLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLevel::Crisis => "crisis",
            SentimentLevel::Negative => "negative",
            SentimentLevel::Neutral => "neutral",
            SentimentLevel::Positive => "positive",
        }
    }
}

impl fmt::Display for SentimentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

/// A risk keyword found in the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskHit {
    pub keyword: String,
    pub level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub level: SentimentLevel,
    /// 0 (worst) to 100 (best)
    pub score: u8,
    pub risks: Vec<RiskHit>,
}

impl SentimentVerdict {
    pub fn neutral() -> Self {
        Self {
            level: SentimentLevel::Neutral,
            score: 50,
            risks: Vec::new(),
        }
    }

    pub fn is_crisis(&self) -> bool {
        self.level == SentimentLevel::Crisis
    }
}

impl Default for SentimentVerdict {
    fn default() -> Self {
        Self::neutral()
    }
}

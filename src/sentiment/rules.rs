// Ordered classification rules
//
// Each rule looks at the keyword scan and either decides the verdict or passes.
// Rules run in the order of RULES and the first decision wins.

use super::{RiskHit, RiskLevel, SentimentLevel, SentimentVerdict};
use crate::lexicon::{mentions, Lexicon};

/// Keyword hits for one normalized input text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordScan {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
    pub positive_count: usize,
}

impl KeywordScan {
    /// Scan `normalized` (already lower-cased and trimmed) against every tier
    pub fn scan(lexicon: &Lexicon, normalized: &str) -> Self {
        Self {
            high: hits(&lexicon.risk.high, normalized),
            medium: hits(&lexicon.risk.medium, normalized),
            low: hits(&lexicon.risk.low, normalized),
            positive_count: positive_hits(&lexicon.positive_words, normalized),
        }
    }

    fn has_risk(&self) -> bool {
        !self.medium.is_empty() || !self.low.is_empty()
    }
}

/// Distinct keywords contained in the text, in table order
fn hits(keywords: &[String], normalized: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for keyword in keywords {
        if normalized.contains(keyword.as_str()) && !found.contains(keyword) {
            found.push(keyword.clone());
        }
    }
    found
}

/// Positive words count only at a word start, so "feliz" inside "infeliz"
/// or "tranquilo" inside "intranquilo" never lifts a verdict
fn positive_hits(keywords: &[String], normalized: &str) -> usize {
    let mut found: Vec<&String> = Vec::new();
    for keyword in keywords {
        if mentions(normalized, keyword) && !found.contains(&keyword) {
            found.push(keyword);
        }
    }
    found.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleTag {
    HighRiskOverride,
    MediumRiskPair,
    PositiveOnly,
    AnyRisk,
    Neutral,
}

impl RuleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleTag::HighRiskOverride => "high_risk_override",
            RuleTag::MediumRiskPair => "medium_risk_pair",
            RuleTag::PositiveOnly => "positive_only",
            RuleTag::AnyRisk => "any_risk",
            RuleTag::Neutral => "neutral",
        }
    }
}

pub struct ClassificationRule {
    pub tag: RuleTag,
    pub apply: fn(&KeywordScan) -> Option<SentimentVerdict>,
}

pub(super) static RULES: [ClassificationRule; 5] = [
    ClassificationRule {
        tag: RuleTag::HighRiskOverride,
        apply: high_risk_override,
    },
    ClassificationRule {
        tag: RuleTag::MediumRiskPair,
        apply: medium_risk_pair,
    },
    ClassificationRule {
        tag: RuleTag::PositiveOnly,
        apply: positive_only,
    },
    ClassificationRule {
        tag: RuleTag::AnyRisk,
        apply: any_risk,
    },
    ClassificationRule {
        tag: RuleTag::Neutral,
        apply: neutral,
    },
];

fn tagged(keywords: &[String], level: RiskLevel) -> impl Iterator<Item = RiskHit> + '_ {
    keywords.iter().map(move |keyword| RiskHit {
        keyword: keyword.clone(),
        level,
    })
}

fn high_risk_override(scan: &KeywordScan) -> Option<SentimentVerdict> {
    if scan.high.is_empty() {
        return None;
    }
    Some(SentimentVerdict {
        level: SentimentLevel::Crisis,
        score: 0,
        risks: tagged(&scan.high, RiskLevel::High).collect(),
    })
}

fn medium_risk_pair(scan: &KeywordScan) -> Option<SentimentVerdict> {
    if scan.medium.len() < 2 {
        return None;
    }
    Some(SentimentVerdict {
        level: SentimentLevel::Negative,
        score: 20,
        risks: tagged(&scan.medium, RiskLevel::Medium).collect(),
    })
}

fn positive_only(scan: &KeywordScan) -> Option<SentimentVerdict> {
    if scan.positive_count == 0 || scan.has_risk() {
        return None;
    }
    let bonus = (scan.positive_count * 5).min(20) as u8;
    Some(SentimentVerdict {
        level: SentimentLevel::Positive,
        score: 80 + bonus,
        risks: Vec::new(),
    })
}

fn any_risk(scan: &KeywordScan) -> Option<SentimentVerdict> {
    if !scan.has_risk() {
        return None;
    }
    let penalty = scan.medium.len() as i64 * 15 + scan.low.len() as i64 * 5;
    let score = (50 - penalty).max(10) as u8;
    Some(SentimentVerdict {
        level: SentimentLevel::Negative,
        score,
        risks: tagged(&scan.medium, RiskLevel::Medium)
            .chain(tagged(&scan.low, RiskLevel::Low))
            .collect(),
    })
}

fn neutral(_scan: &KeywordScan) -> Option<SentimentVerdict> {
    Some(SentimentVerdict::neutral())
}

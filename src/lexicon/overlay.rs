// Partial lexicon files
//
// Every field is optional. A field that is present replaces the matching
// built-in table; anything left out keeps the built-in value. Knowledge bases
// merge per approach and per field.

use super::{KnowledgeBase, LevelTable, Lexicon, RiskKeywords};
use crate::approach::Approach;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(super) struct LexiconOverlay {
    risk: Option<RiskOverlay>,
    positive_words: Option<Vec<String>>,
    knowledge_bases: Option<HashMap<Approach, KnowledgeBaseOverlay>>,
    level_responses: Option<LevelOverlay>,
    crisis_responses: Option<Vec<String>>,
    follow_ups: Option<LevelOverlay>,
    activities: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RiskOverlay {
    high: Option<Vec<String>>,
    medium: Option<Vec<String>>,
    low: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LevelOverlay {
    crisis: Option<Vec<String>>,
    negative: Option<Vec<String>>,
    neutral: Option<Vec<String>>,
    positive: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct KnowledgeBaseOverlay {
    keywords: Option<Vec<String>>,
    responses: Option<Vec<String>>,
    fallback_prefix: Option<String>,
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

impl LexiconOverlay {
    /// Apply the given sections on top of `base`
    pub(super) fn apply(self, mut base: Lexicon) -> Lexicon {
        if let Some(risk) = self.risk {
            risk.apply(&mut base.risk);
        }
        replace(&mut base.positive_words, self.positive_words);
        if let Some(bases) = self.knowledge_bases {
            for (approach, overlay) in bases {
                overlay.apply(base.knowledge_bases.entry(approach).or_default());
            }
        }
        if let Some(levels) = self.level_responses {
            levels.apply(&mut base.level_responses);
        }
        replace(&mut base.crisis_responses, self.crisis_responses);
        if let Some(levels) = self.follow_ups {
            levels.apply(&mut base.follow_ups);
        }
        replace(&mut base.activities, self.activities);
        base
    }

    /// Number of top-level sections the file provided
    pub(super) fn section_count(&self) -> usize {
        [
            self.risk.is_some(),
            self.positive_words.is_some(),
            self.knowledge_bases.is_some(),
            self.level_responses.is_some(),
            self.crisis_responses.is_some(),
            self.follow_ups.is_some(),
            self.activities.is_some(),
        ]
        .iter()
        .filter(|given| **given)
        .count()
    }
}

impl RiskOverlay {
    fn apply(self, risk: &mut RiskKeywords) {
        replace(&mut risk.high, self.high);
        replace(&mut risk.medium, self.medium);
        replace(&mut risk.low, self.low);
    }
}

impl LevelOverlay {
    fn apply(self, table: &mut LevelTable) {
        replace(&mut table.crisis, self.crisis);
        replace(&mut table.negative, self.negative);
        replace(&mut table.neutral, self.neutral);
        replace(&mut table.positive, self.positive);
    }
}

impl KnowledgeBaseOverlay {
    fn apply(self, kb: &mut KnowledgeBase) {
        replace(&mut kb.keywords, self.keywords);
        replace(&mut kb.responses, self.responses);
        if self.fallback_prefix.is_some() {
            kb.fallback_prefix = self.fallback_prefix;
        }
    }
}

// Keyword and response tables
//
// Everything the classifier and the local generator match against lives here.
// The built-in tables are Portuguese; a JSON file with the same shape can
// override any subset of them, down to a single risk tier or level.

mod builtin;
mod knowledge;
mod overlay;

pub use knowledge::KnowledgeBase;

use crate::approach::Approach;
use crate::sentiment::SentimentLevel;
use anyhow::{Context, Result};
use overlay::LexiconOverlay;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Risk keywords by tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskKeywords {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

/// A list of strings per sentiment level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTable {
    pub crisis: Vec<String>,
    pub negative: Vec<String>,
    pub neutral: Vec<String>,
    pub positive: Vec<String>,
}

impl LevelTable {
    pub fn for_level(&self, level: SentimentLevel) -> &[String] {
        match level {
            SentimentLevel::Crisis => &self.crisis,
            SentimentLevel::Negative => &self.negative,
            SentimentLevel::Neutral => &self.neutral,
            SentimentLevel::Positive => &self.positive,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Lexicon {
    pub risk: RiskKeywords,
    pub positive_words: Vec<String>,
    pub knowledge_bases: HashMap<Approach, KnowledgeBase>,
    /// Canned replies by sentiment level
    pub level_responses: LevelTable,
    /// Replies used when a crisis is detected
    pub crisis_responses: Vec<String>,
    pub follow_ups: LevelTable,
    /// Small self-care activities offered alongside negative replies
    pub activities: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            risk: builtin::risk_keywords(),
            positive_words: builtin::positive_words(),
            knowledge_bases: builtin::knowledge_bases(),
            level_responses: builtin::level_responses(),
            crisis_responses: builtin::crisis_responses(),
            follow_ups: builtin::follow_ups(),
            activities: builtin::activities(),
        }
    }
}

impl Lexicon {
    /// Load a lexicon from a JSON file. Absent sections, tiers and levels
    /// keep the built-in tables.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon file: {}", path.display()))?;

        let overlay: LexiconOverlay = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse lexicon file: {}", path.display()))?;
        let sections = overlay.section_count();
        let lexicon = overlay.apply(Lexicon::default());

        tracing::info!(
            "Loaded lexicon from {} ({} sections; {} high, {} medium, {} low risk keywords)",
            path.display(),
            sections,
            lexicon.risk.high.len(),
            lexicon.risk.medium.len(),
            lexicon.risk.low.len()
        );

        Ok(lexicon.normalized())
    }

    /// Knowledge base for an approach, if one is defined
    pub fn knowledge_base(&self, approach: Approach) -> Option<&KnowledgeBase> {
        self.knowledge_bases.get(&approach)
    }

    /// Lower-case and de-duplicate every keyword list so matching can work on
    /// normalized text
    fn normalized(mut self) -> Self {
        lowercase_in_place(&mut self.risk.high);
        lowercase_in_place(&mut self.risk.medium);
        lowercase_in_place(&mut self.risk.low);
        lowercase_in_place(&mut self.positive_words);
        for kb in self.knowledge_bases.values_mut() {
            lowercase_in_place(&mut kb.keywords);
        }
        self
    }
}

/// True when `keyword` occurs in `normalized` at the start of a word.
/// Suffixes still match ("feliz" finds "felizmente") but "feliz" is not
/// found inside "infeliz".
pub fn mentions(normalized: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }
    normalized.match_indices(keyword).any(|(start, _)| {
        normalized[..start]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric())
    })
}

fn lowercase_in_place(list: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    list.retain_mut(|word| {
        *word = word.trim().to_lowercase();
        !word.is_empty() && seen.insert(word.clone())
    });
}

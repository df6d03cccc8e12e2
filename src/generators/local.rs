// Local response generator
//
// Picks canned responses from the lexicon. Randomness comes from a seedable
// StdRng so tests can pin the choices.

use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{Reply, ReplySource, ResponseStrategy, Turn};
use crate::approach::Approach;
use crate::lexicon::Lexicon;
use crate::sentiment::{SentimentLevel, SentimentVerdict};

/// Chance of answering from a non-general knowledge base without a keyword match
pub const KNOWLEDGE_BASE_PROBABILITY: f64 = 0.4;
/// Chance of prepending the approach's framing prefix
pub const PREFIX_PROBABILITY: f64 = 0.3;
/// Activities attached to negative replies
const SUGGESTION_COUNT: usize = 2;

const LAST_RESORT_REPLY: &str = "Estou aqui com você. Quer me contar mais?";

/// Probabilities that shape response variety
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    pub knowledge_base_probability: f64,
    pub prefix_probability: f64,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            knowledge_base_probability: KNOWLEDGE_BASE_PROBABILITY,
            prefix_probability: PREFIX_PROBABILITY,
        }
    }
}

pub struct LocalGenerator {
    lexicon: Arc<Lexicon>,
    tuning: GenerationTuning,
    rng: Mutex<StdRng>,
}

impl LocalGenerator {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_rng(lexicon, StdRng::from_entropy())
    }

    /// Deterministic generator for tests and reproducible sessions
    pub fn with_seed(lexicon: Arc<Lexicon>, seed: u64) -> Self {
        Self::with_rng(lexicon, StdRng::seed_from_u64(seed))
    }

    fn with_rng(lexicon: Arc<Lexicon>, rng: StdRng) -> Self {
        Self {
            lexicon,
            tuning: GenerationTuning::default(),
            rng: Mutex::new(rng),
        }
    }

    pub fn with_tuning(mut self, tuning: GenerationTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn tuning(&self) -> GenerationTuning {
        self.tuning
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Build a reply for non-crisis text
    pub fn generate(&self, text: &str, verdict: &SentimentVerdict, approach: Approach) -> Reply {
        let normalized = text.trim().to_lowercase();
        let lexicon = &self.lexicon;
        let mut rng = self.rng();

        let knowledge_base = lexicon
            .knowledge_base(approach)
            .filter(|kb| !kb.responses.is_empty());

        let from_knowledge_base = knowledge_base.and_then(|kb| {
            let selected = kb.matches(&normalized)
                || (!approach.is_general()
                    && rng.gen_bool(clamp(self.tuning.knowledge_base_probability)));
            if selected {
                kb.responses.choose(&mut *rng).cloned()
            } else {
                None
            }
        });

        let mut text = match from_knowledge_base {
            Some(response) => response,
            None => {
                let table = match lexicon.level_responses.for_level(verdict.level) {
                    [] => lexicon.level_responses.for_level(SentimentLevel::Neutral),
                    table => table,
                };
                table
                    .choose(&mut *rng)
                    .cloned()
                    .unwrap_or_else(|| LAST_RESORT_REPLY.to_string())
            }
        };

        if !approach.is_general() {
            if let Some(prefix) = knowledge_base.and_then(|kb| kb.fallback_prefix.as_deref()) {
                if rng.gen_bool(clamp(self.tuning.prefix_probability)) {
                    text = format!("{} {}", prefix, lowercase_first(&text));
                }
            }
        }

        let follow_up = lexicon
            .follow_ups
            .for_level(verdict.level)
            .choose(&mut *rng)
            .cloned();

        let suggestions = if verdict.level == SentimentLevel::Negative {
            lexicon
                .activities
                .choose_multiple(&mut *rng, SUGGESTION_COUNT)
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        Reply {
            text,
            follow_up,
            suggestions,
            show_emergency: false,
            is_crisis: false,
            source: ReplySource::Local,
        }
    }
}

#[async_trait]
impl ResponseStrategy for LocalGenerator {
    async fn respond(&self, turn: &Turn<'_>) -> Result<Reply> {
        Ok(self.generate(turn.text, turn.verdict, turn.approach))
    }

    fn name(&self) -> &str {
        "local"
    }
}

fn clamp(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::SentimentClassifier;

    fn lexicon() -> Arc<Lexicon> {
        Arc::new(Lexicon::default())
    }

    fn verdict(text: &str) -> SentimentVerdict {
        SentimentClassifier::new(lexicon()).classify(text)
    }

    fn never() -> GenerationTuning {
        GenerationTuning {
            knowledge_base_probability: 0.0,
            prefix_probability: 0.0,
        }
    }

    fn always() -> GenerationTuning {
        GenerationTuning {
            knowledge_base_probability: 1.0,
            prefix_probability: 1.0,
        }
    }

    #[test]
    fn test_positive_text_uses_positive_table() {
        let lexicon = lexicon();
        let generator = LocalGenerator::with_seed(lexicon.clone(), 7);
        let text = "estou feliz e tranquilo hoje";

        let reply = generator.generate(text, &verdict(text), Approach::General);
        assert!(lexicon.level_responses.positive.contains(&reply.text));
        assert!(lexicon.follow_ups.positive.contains(reply.follow_up.as_ref().unwrap()));
        assert!(!reply.show_emergency);
        assert!(!reply.is_crisis);
        assert!(reply.suggestions.is_empty());
        assert_eq!(reply.source, ReplySource::Local);
    }

    #[test]
    fn test_keyword_match_selects_knowledge_base() {
        let lexicon = lexicon();
        let generator = LocalGenerator::with_seed(lexicon.clone(), 1).with_tuning(never());
        let text = "quero aprender a respirar melhor";

        let reply = generator.generate(text, &verdict(text), Approach::General);
        let kb = lexicon.knowledge_base(Approach::General).unwrap();
        assert!(kb.responses.contains(&reply.text));
    }

    #[test]
    fn test_non_general_approach_can_answer_without_match() {
        let lexicon = lexicon();
        let generator = LocalGenerator::with_seed(lexicon.clone(), 3).with_tuning(GenerationTuning {
            knowledge_base_probability: 1.0,
            prefix_probability: 0.0,
        });
        let text = "fui ao mercado";

        let reply = generator.generate(text, &verdict(text), Approach::Mindfulness);
        let kb = lexicon.knowledge_base(Approach::Mindfulness).unwrap();
        assert!(kb.responses.contains(&reply.text));
    }

    #[test]
    fn test_general_approach_never_rolls_for_knowledge_base() {
        let lexicon = lexicon();
        let generator = LocalGenerator::with_seed(lexicon.clone(), 3).with_tuning(always());
        let text = "fui ao mercado";

        let reply = generator.generate(text, &verdict(text), Approach::General);
        assert!(lexicon.level_responses.neutral.contains(&reply.text));
    }

    #[test]
    fn test_prefix_lowercases_first_character() {
        let lexicon = lexicon();
        let generator = LocalGenerator::with_seed(lexicon.clone(), 11).with_tuning(always());
        let text = "fui ao mercado";

        let reply = generator.generate(text, &verdict(text), Approach::Cbt);
        let kb = lexicon.knowledge_base(Approach::Cbt).unwrap();
        let prefix = kb.fallback_prefix.as_deref().unwrap();

        assert!(reply.text.starts_with(prefix));
        let rest = reply.text[prefix.len() + 1..].to_string();
        assert!(kb
            .responses
            .iter()
            .any(|r| lowercase_first(r) == rest));
    }

    #[test]
    fn test_negative_reply_carries_activities() {
        let lexicon = lexicon();
        let generator = LocalGenerator::with_seed(lexicon.clone(), 5).with_tuning(never());
        let text = "trabalho e sono";

        let reply = generator.generate(text, &verdict(text), Approach::General);
        assert!(lexicon.level_responses.negative.contains(&reply.text));
        assert_eq!(reply.suggestions.len(), SUGGESTION_COUNT);
        assert!(reply.suggestions.iter().all(|s| lexicon.activities.contains(s)));
    }

    #[test]
    fn test_same_seed_same_reply() {
        let text = "ando ansioso";
        let a = LocalGenerator::with_seed(lexicon(), 42).generate(text, &verdict(text), Approach::Friend);
        let b = LocalGenerator::with_seed(lexicon(), 42).generate(text, &verdict(text), Approach::Friend);
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_level_table_falls_back_to_neutral() {
        let mut custom = Lexicon::default();
        custom.level_responses.positive.clear();
        let custom = Arc::new(custom);
        let generator = LocalGenerator::with_seed(custom.clone(), 2).with_tuning(never());
        let text = "estou feliz";

        let reply = generator.generate(text, &verdict(text), Approach::General);
        assert!(custom.level_responses.neutral.contains(&reply.text));
    }

    #[test]
    fn test_crisis_level_has_no_follow_up() {
        let generator = LocalGenerator::with_seed(lexicon(), 9);
        let reply = generator.generate("quero morrer", &verdict("quero morrer"), Approach::General);
        assert!(reply.follow_up.is_none());
    }

    #[test]
    fn test_lowercase_first() {
        assert_eq!(lowercase_first("Às vezes"), "às vezes");
        assert_eq!(lowercase_first(""), "");
    }
}

// Acolhe - emotional-support companion core
// Library exports

pub mod approach;
pub mod companion; // Turn pipeline and sessions
pub mod config;
pub mod crisis;
pub mod errors;
pub mod generators; // Local and remote response strategies
pub mod insights;
pub mod lexicon;
pub mod metrics;
pub mod prompt;
pub mod providers; // Remote LLM clients
pub mod sentiment;
pub mod store;

pub use approach::Approach;
pub use companion::{ChatSession, Companion, TurnOutcome};
pub use sentiment::{SentimentClassifier, SentimentLevel, SentimentVerdict};

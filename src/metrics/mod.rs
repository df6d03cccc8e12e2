// Metrics module
// Per-turn metrics written as JSON lines, one file per day

mod logger;
mod types;

pub use logger::MetricsLogger;
pub use types::{DailySummary, TurnMetric};

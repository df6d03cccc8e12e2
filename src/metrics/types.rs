// Metrics data types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generators::ReplySource;
use crate::sentiment::SentimentLevel;

/// One handled message. Holds a hash of the user's text, never the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnMetric {
    pub timestamp: DateTime<Utc>,
    pub text_hash: String,
    pub level: SentimentLevel,
    pub score: u8,
    pub source: ReplySource,
    /// Remote generation was attempted but the local generator answered
    pub fell_back: bool,
    pub response_time_ms: u64,
}

impl TurnMetric {
    pub fn new(
        text_hash: String,
        level: SentimentLevel,
        score: u8,
        source: ReplySource,
        fell_back: bool,
        response_time_ms: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            text_hash,
            level,
            score,
            source,
            fell_back,
            response_time_ms,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailySummary {
    pub total: usize,
    pub crisis_count: usize,
    pub remote_count: usize,
    pub local_count: usize,
    pub fallback_count: usize,
    pub avg_response_time_ms: u64,
}

impl DailySummary {
    pub fn from_metrics(metrics: &[TurnMetric]) -> Self {
        let mut summary = Self {
            total: metrics.len(),
            ..Default::default()
        };

        let mut total_time = 0u64;
        for metric in metrics {
            match metric.source {
                ReplySource::Crisis => summary.crisis_count += 1,
                ReplySource::Remote => summary.remote_count += 1,
                ReplySource::Local => summary.local_count += 1,
            }
            if metric.fell_back {
                summary.fallback_count += 1;
            }
            total_time += metric.response_time_ms;
        }

        if !metrics.is_empty() {
            summary.avg_response_time_ms = total_time / metrics.len() as u64;
        }
        summary
    }
}

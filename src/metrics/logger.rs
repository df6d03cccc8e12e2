// JSONL metrics logger

use anyhow::{Context, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{DailySummary, TurnMetric};

pub struct MetricsLogger {
    metrics_dir: PathBuf,
}

impl MetricsLogger {
    pub fn new(metrics_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&metrics_dir).with_context(|| {
            format!(
                "Failed to create metrics directory: {}",
                metrics_dir.display()
            )
        })?;
        Ok(Self { metrics_dir })
    }

    pub fn metrics_dir(&self) -> &Path {
        &self.metrics_dir
    }

    /// SHA-256 of the normalized text, hex encoded
    pub fn hash_text(text: &str) -> String {
        let normalized = text
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let digest = Sha256::digest(normalized.as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn today_path(&self) -> PathBuf {
        self.metrics_dir
            .join(format!("{}.jsonl", Utc::now().format("%Y-%m-%d")))
    }

    pub fn log(&self, metric: &TurnMetric) -> Result<()> {
        let path = self.today_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open metrics file: {}", path.display()))?;

        let line = serde_json::to_string(metric).context("Failed to serialize metric")?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write metrics file: {}", path.display()))?;
        Ok(())
    }

    /// Read today's metrics; malformed lines are skipped
    pub fn read_today(&self) -> Result<Vec<TurnMetric>> {
        let path = self.today_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read metrics file: {}", path.display()))?;

        Ok(contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(metric) => Some(metric),
                Err(e) => {
                    tracing::debug!("Skipping malformed metric line: {}", e);
                    None
                }
            })
            .collect())
    }

    pub fn get_today_summary(&self) -> Result<DailySummary> {
        Ok(DailySummary::from_metrics(&self.read_today()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::ReplySource;
    use crate::sentiment::SentimentLevel;
    use tempfile::TempDir;

    #[test]
    fn test_hash_is_stable_and_hides_text() {
        let a = MetricsLogger::hash_text("Quero  MORRER");
        let b = MetricsLogger::hash_text("quero morrer");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(!a.contains("morrer"));
    }

    #[test]
    fn test_log_and_summarize() {
        let dir = TempDir::new().unwrap();
        let logger = MetricsLogger::new(dir.path().join("metrics")).unwrap();

        let hash = MetricsLogger::hash_text("oi");
        logger
            .log(&TurnMetric::new(hash.clone(), SentimentLevel::Neutral, 50, ReplySource::Remote, false, 100))
            .unwrap();
        logger
            .log(&TurnMetric::new(hash.clone(), SentimentLevel::Negative, 20, ReplySource::Local, true, 300))
            .unwrap();
        logger
            .log(&TurnMetric::new(hash, SentimentLevel::Crisis, 0, ReplySource::Crisis, false, 2))
            .unwrap();

        let summary = logger.get_today_summary().unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.remote_count, 1);
        assert_eq!(summary.local_count, 1);
        assert_eq!(summary.crisis_count, 1);
        assert_eq!(summary.fallback_count, 1);
        assert_eq!(summary.avg_response_time_ms, 134);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let logger = MetricsLogger::new(dir.path().to_path_buf()).unwrap();
        fs::write(logger.today_path(), "not json\n\n").unwrap();

        assert!(logger.read_today().unwrap().is_empty());
    }
}

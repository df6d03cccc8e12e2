// End-to-end turn pipeline
//
// Verifies that:
// 1. A crisis verdict escalates without running any generator
// 2. Auto-dial targets the first personal contact, else the hotline
// 3. Local-only mode answers from the level tables
// 4. Metrics record the turn without the raw text

use acolhe::config::Config;
use acolhe::crisis::{CallOutcome, Dialer, CRISIS_HOTLINE_PHONE};
use acolhe::generators::ReplySource;
use acolhe::lexicon::Lexicon;
use acolhe::metrics::MetricsLogger;
use acolhe::store::{ContactStore, LocalStore};
use acolhe::{ChatSession, Companion, SentimentLevel};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Default)]
struct RecordingDialer {
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Dialer for RecordingDialer {
    async fn make_call(&self, phone: &str) -> CallOutcome {
        self.calls.lock().await.push(phone.to_string());
        CallOutcome::ok()
    }
}

fn local_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.data_dir = dir.path().to_path_buf();
    config.crisis.auto_dial_delay_ms = 0;
    config
}

#[tokio::test]
async fn test_crisis_dials_hotline_without_personal_contacts() {
    let dir = tempfile::TempDir::new().unwrap();
    let companion =
        Companion::from_config(&local_config(&dir), Arc::new(LocalStore::in_memory())).unwrap();
    let mut session = ChatSession::default();

    let outcome = companion.handle_message(&mut session, "quero morrer").await.unwrap();
    assert_eq!(outcome.verdict.level, SentimentLevel::Crisis);
    assert_eq!(outcome.verdict.score, 0);
    assert!(outcome.reply.show_emergency);
    assert_eq!(outcome.reply.source, ReplySource::Crisis);
    assert!(Lexicon::default().crisis_responses.contains(&outcome.reply.text));

    let plan = outcome.escalation.expect("crisis turn must escalate");
    assert_eq!(plan.delay, Duration::ZERO);
    assert_eq!(plan.chips.len(), 2);

    let dialer = Arc::new(RecordingDialer::default());
    let result = plan.spawn(dialer.clone()).await.unwrap();
    assert!(result.success);
    assert_eq!(*dialer.calls.lock().await, vec![CRISIS_HOTLINE_PHONE.to_string()]);
}

#[tokio::test]
async fn test_crisis_dials_first_personal_contact() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = Arc::new(LocalStore::in_memory());
    let mut book = store.get_emergency_contacts().await.unwrap();
    book.add_personal("Mãe", "11 98888-7777").unwrap();
    book.add_personal("Amigo", "21 97777-6666").unwrap();
    store.save_emergency_contacts(&book).await.unwrap();

    let companion = Companion::from_config(&local_config(&dir), store).unwrap();
    let mut session = ChatSession::default();

    let outcome = companion.handle_message(&mut session, "Quero morrer").await.unwrap();
    let plan = outcome.escalation.unwrap();
    assert_eq!(plan.dial_target.name, "Mãe");
    assert_eq!(plan.chips.len(), 4);

    let dialer = RecordingDialer::default();
    plan.execute(&dialer).await;
    assert_eq!(*dialer.calls.lock().await, vec!["11 98888-7777".to_string()]);
}

#[tokio::test]
async fn test_local_only_positive_reply() {
    let dir = tempfile::TempDir::new().unwrap();
    let companion =
        Companion::from_config(&local_config(&dir), Arc::new(LocalStore::in_memory())).unwrap();
    assert_eq!(companion.strategy_name(), "local");
    let mut session = ChatSession::default();

    let outcome = companion
        .handle_message(&mut session, "estou feliz e tranquilo hoje")
        .await
        .unwrap();

    assert_eq!(outcome.verdict.level, SentimentLevel::Positive);
    assert_eq!(outcome.verdict.score, 90);
    assert!(outcome.escalation.is_none());
    assert!(!outcome.reply.show_emergency);
    assert_eq!(outcome.reply.source, ReplySource::Local);
}

#[tokio::test]
async fn test_medium_pair_is_negative() {
    let dir = tempfile::TempDir::new().unwrap();
    let companion =
        Companion::from_config(&local_config(&dir), Arc::new(LocalStore::in_memory())).unwrap();
    let mut session = ChatSession::default();

    let outcome = companion.handle_message(&mut session, "trabalho e sono").await.unwrap();
    assert_eq!(outcome.verdict.level, SentimentLevel::Negative);
    assert_eq!(outcome.verdict.score, 20);
    assert!(!outcome.reply.suggestions.is_empty());
}

#[tokio::test]
async fn test_metrics_hash_the_text() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = local_config(&dir);
    let companion = Companion::from_config(&config, Arc::new(LocalStore::in_memory())).unwrap();
    let mut session = ChatSession::default();

    companion.handle_message(&mut session, "quero morrer").await.unwrap();
    companion.handle_message(&mut session, "oi").await.unwrap();

    let logger = MetricsLogger::new(config.metrics_dir()).unwrap();
    let metrics = logger.read_today().unwrap();
    assert_eq!(metrics.len(), 2);
    assert_eq!(metrics[0].source, ReplySource::Crisis);
    assert_eq!(metrics[0].text_hash, MetricsLogger::hash_text("quero morrer"));
    assert!(!metrics[1].fell_back);

    let raw = std::fs::read_dir(config.metrics_dir())
        .unwrap()
        .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
        .collect::<String>();
    assert!(!raw.contains("morrer"));
}

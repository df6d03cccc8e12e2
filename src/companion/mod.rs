// Conversation pipeline
//
// One turn: classify, escalate on crisis (no generator runs), otherwise ask
// the active strategy. The exchange is then recorded, spoken and measured.

mod session;

pub use session::ChatSession;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::approach::Approach;
use crate::config::Config;
use crate::crisis::{ContactBook, CrisisEscalation, EscalationPlan};
use crate::generators::{LocalGenerator, RemoteGenerator, Reply, ReplySource, ResponseStrategy, Turn};
use crate::insights::SessionSummarizer;
use crate::lexicon::Lexicon;
use crate::metrics::{MetricsLogger, TurnMetric};
use crate::providers::{create_provider, LlmProvider};
use crate::sentiment::{SentimentClassifier, SentimentVerdict};
use crate::store::{ChatMessage, CompanionStore, SilentSpeaker, Speaker, MAX_CHAT_HISTORY};

/// Result of handling one user message
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub verdict: SentimentVerdict,
    pub reply: Reply,
    /// Present only for crisis turns; the caller runs or spawns it
    pub escalation: Option<EscalationPlan>,
}

pub struct Companion {
    classifier: SentimentClassifier,
    strategy: Box<dyn ResponseStrategy>,
    escalation: CrisisEscalation,
    summarizer: SessionSummarizer,
    store: Arc<dyn CompanionStore>,
    speaker: Arc<dyn Speaker>,
    metrics: Option<MetricsLogger>,
}

impl Companion {
    /// Local-only companion: canned responses, no summaries
    pub fn new(lexicon: Arc<Lexicon>, store: Arc<dyn CompanionStore>) -> Self {
        Self {
            classifier: SentimentClassifier::new(lexicon.clone()),
            strategy: Box::new(LocalGenerator::new(lexicon.clone())),
            escalation: CrisisEscalation::new(lexicon),
            summarizer: SessionSummarizer::default(),
            store,
            speaker: Arc::new(SilentSpeaker),
            metrics: None,
        }
    }

    /// Build from configuration. Remote generation is enabled only when a
    /// provider is configured.
    pub fn from_config(config: &Config, store: Arc<dyn CompanionStore>) -> Result<Self> {
        let lexicon = match &config.lexicon_path {
            Some(path) => Arc::new(Lexicon::load_from_file(path)?),
            None => Arc::new(Lexicon::default()),
        };

        let local = LocalGenerator::new(lexicon.clone()).with_tuning(config.generation);
        let escalation = CrisisEscalation::new(lexicon.clone())
            .with_delay(Duration::from_millis(config.crisis.auto_dial_delay_ms));

        let mut companion = Self::new(lexicon, store).with_escalation(escalation);

        if config.has_remote() {
            let provider: Arc<dyn LlmProvider> = Arc::from(create_provider(&config.providers)?);
            tracing::info!("Remote generation enabled via {}", provider.name());
            companion = companion.with_provider(provider, local);
        } else {
            tracing::info!("No provider configured; using local responses only");
            companion = companion.with_strategy(Box::new(local));
        }

        if config.features.metrics {
            let logger = MetricsLogger::new(config.metrics_dir())
                .context("Failed to initialize metrics logger")?;
            companion = companion.with_metrics(logger);
        }

        Ok(companion)
    }

    /// Answer through `provider`, falling back to `local`; also enables summaries
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>, local: LocalGenerator) -> Self {
        self.summarizer = SessionSummarizer::new(Some(provider.clone()));
        self.strategy = Box::new(RemoteGenerator::new(provider, local));
        self
    }

    pub fn with_strategy(mut self, strategy: Box<dyn ResponseStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_escalation(mut self, escalation: CrisisEscalation) -> Self {
        self.escalation = escalation;
        self
    }

    pub fn with_summarizer(mut self, summarizer: SessionSummarizer) -> Self {
        self.summarizer = summarizer;
        self
    }

    pub fn with_speaker(mut self, speaker: Arc<dyn Speaker>) -> Self {
        self.speaker = speaker;
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsLogger) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn store(&self) -> &Arc<dyn CompanionStore> {
        &self.store
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    /// Open a session with the saved approach and, when history saving is
    /// on, the stored conversation
    pub async fn start_session(&self) -> Result<ChatSession> {
        let settings = self.store.get_settings().await?;
        let history = if settings.privacy.save_history {
            self.store.get_chat_history(MAX_CHAT_HISTORY).await?
        } else {
            Vec::new()
        };
        Ok(ChatSession::with_history(
            settings.therapeutic_approach,
            history,
        ))
    }

    pub async fn handle_message(&self, session: &mut ChatSession, text: &str) -> Result<TurnOutcome> {
        let start = Instant::now();
        let verdict = self.classifier.classify(text);
        tracing::debug!("Verdict: {:?} (score {})", verdict.level, verdict.score);

        // Storage trouble must never cost a crisis turn its escalation
        let crisis = if verdict.is_crisis() {
            let contacts = match self.store.get_emergency_contacts().await {
                Ok(book) => book,
                Err(e) => {
                    tracing::warn!("Could not read emergency contacts, using hotlines only: {:#}", e);
                    ContactBook::new()
                }
            };
            self.escalation.on_crisis_detected(&verdict, &contacts)
        } else {
            None
        };

        let (reply, escalation) = match crisis {
            Some(response) => (response.reply, Some(response.plan)),
            None => {
                let insights = self.store.get_insights().await.unwrap_or_else(|e| {
                    tracing::warn!("Could not read insights: {:#}", e);
                    Vec::new()
                });
                let turn = Turn {
                    text,
                    verdict: &verdict,
                    approach: session.approach,
                    history: session.history(),
                    insights: &insights,
                };
                (self.strategy.respond(&turn).await?, None)
            }
        };

        if let Err(e) = self.record_exchange(session, text, &reply).await {
            tracing::warn!("Failed to save chat history: {:#}", e);
        }
        self.speak(&reply).await;
        self.record_metric(text, &verdict, &reply, start.elapsed());

        Ok(TurnOutcome {
            verdict,
            reply,
            escalation,
        })
    }

    /// Push the exchange onto the session, then persist it. The session is
    /// updated even when persisting fails.
    async fn record_exchange(&self, session: &mut ChatSession, text: &str, reply: &Reply) -> Result<()> {
        let user = ChatMessage::new(text, true);
        let assistant = ChatMessage::new(reply.text.clone(), false)
            .with_crisis_flags(reply.show_emergency, reply.is_crisis);

        session.push(user.clone());
        session.push(assistant.clone());

        let settings = self.store.get_settings().await?;
        if settings.privacy.save_history {
            self.store.add_chat_message(user).await?;
            self.store.add_chat_message(assistant).await?;
        }
        Ok(())
    }

    async fn speak(&self, reply: &Reply) {
        let enabled = match self.store.get_settings().await {
            Ok(settings) => settings.voice.enabled,
            Err(e) => {
                tracing::warn!("Could not read voice settings: {:#}", e);
                false
            }
        };
        if !enabled {
            return;
        }
        if let Err(e) = self.speaker.speak(&reply.text).await {
            tracing::warn!("Speech output failed: {:#}", e);
        }
    }

    fn record_metric(&self, text: &str, verdict: &SentimentVerdict, reply: &Reply, elapsed: Duration) {
        let Some(logger) = &self.metrics else {
            return;
        };

        let fell_back = self.strategy.name() == "remote" && reply.source == ReplySource::Local;
        let metric = TurnMetric::new(
            MetricsLogger::hash_text(text),
            verdict.level,
            verdict.score,
            reply.source,
            fell_back,
            elapsed.as_millis() as u64,
        );
        if let Err(e) = logger.log(&metric) {
            tracing::warn!("Failed to log metric: {:#}", e);
        }
    }

    /// End the conversation: keep what the summarizer extracts, then clear
    /// the history. Returns the stored insight text, if any.
    pub async fn reset_session(&self, session: &mut ChatSession) -> Result<Option<String>> {
        let summary = self.summarizer.summarize(session.history()).await;

        if let Some(text) = &summary {
            self.store.add_insight(text).await?;
        }

        session.clear();
        self.store.clear_chat_history().await?;
        if let Err(e) = self.speaker.stop().await {
            tracing::warn!("Could not stop speech output: {:#}", e);
        }

        Ok(summary)
    }

    /// Switch the session's approach and remember it for future sessions
    pub async fn set_approach(&self, session: &mut ChatSession, approach: Approach) -> Result<()> {
        let mut settings = self.store.get_settings().await?;
        settings.therapeutic_approach = approach;
        self.store.save_settings(settings).await?;

        tracing::info!("Approach changed to {}", approach.id());
        session.approach = approach;
        Ok(())
    }
}

// Crisis escalation
//
// A crisis verdict short-circuits generation: the user gets a fixed crisis
// reply, the emergency contacts as chips, and a call placed automatically
// after a short delay. There is no confirmation step.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::{CallOutcome, ContactBook, Dialer, EmergencyContact};
use crate::generators::Reply;
use crate::lexicon::Lexicon;
use crate::sentiment::SentimentVerdict;

pub const DEFAULT_AUTO_DIAL_DELAY: Duration = Duration::from_millis(3000);

const FALLBACK_CRISIS_REPLY: &str = "Sinto muito que você esteja passando por isso. Você não \
está sozinho. Estou ligando para alguém que pode ajudar agora; você também pode falar com o \
CVV pelo 188, a qualquer hora.";

/// What the caller must do after a crisis verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationPlan {
    /// Contacts to show as quick-dial chips, permanent first
    pub chips: Vec<EmergencyContact>,
    pub dial_target: EmergencyContact,
    pub delay: Duration,
}

impl EscalationPlan {
    /// Wait out the delay, then dial the target
    pub async fn execute(&self, dialer: &dyn Dialer) -> CallOutcome {
        tokio::time::sleep(self.delay).await;

        tracing::warn!(
            "Auto-dialing {} ({})",
            self.dial_target.name,
            self.dial_target.phone
        );
        let outcome = dialer.make_call(&self.dial_target.phone).await;
        if let Some(error) = &outcome.error {
            tracing::error!("Auto-dial to {} failed: {}", self.dial_target.phone, error);
        }
        outcome
    }

    /// Run `execute` on a background task
    pub fn spawn(self, dialer: Arc<dyn Dialer>) -> JoinHandle<CallOutcome> {
        tokio::spawn(async move { self.execute(dialer.as_ref()).await })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrisisResponse {
    pub reply: Reply,
    pub plan: EscalationPlan,
}

pub struct CrisisEscalation {
    lexicon: Arc<Lexicon>,
    rng: Mutex<StdRng>,
    delay: Duration,
}

impl CrisisEscalation {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_rng(lexicon, StdRng::from_entropy())
    }

    pub fn with_seed(lexicon: Arc<Lexicon>, seed: u64) -> Self {
        Self::with_rng(lexicon, StdRng::seed_from_u64(seed))
    }

    fn with_rng(lexicon: Arc<Lexicon>, rng: StdRng) -> Self {
        Self {
            lexicon,
            rng: Mutex::new(rng),
            delay: DEFAULT_AUTO_DIAL_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns None unless the verdict is a crisis
    pub fn on_crisis_detected(
        &self,
        verdict: &SentimentVerdict,
        contacts: &ContactBook,
    ) -> Option<CrisisResponse> {
        if !verdict.is_crisis() {
            return None;
        }

        let text = {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            self.lexicon
                .crisis_responses
                .choose(&mut *rng)
                .cloned()
                .unwrap_or_else(|| FALLBACK_CRISIS_REPLY.to_string())
        };

        let plan = EscalationPlan {
            chips: contacts.all(),
            dial_target: contacts.dial_target(),
            delay: self.delay,
        };

        tracing::warn!(
            "Crisis detected ({} risk hits); escalating to {}",
            verdict.risks.len(),
            plan.dial_target.phone
        );

        Some(CrisisResponse {
            reply: Reply::crisis(text),
            plan,
        })
    }
}

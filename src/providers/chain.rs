// Ordered provider chain
//
// Every request starts again at the primary provider. A backup only sees
// the request that every provider before it failed.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use super::{LlmProvider, ProviderRequest, ProviderResponse};

pub struct ProviderChain {
    primary: Box<dyn LlmProvider>,
    backups: Vec<Box<dyn LlmProvider>>,
}

impl ProviderChain {
    /// Build a chain from providers in priority order. At least one is required.
    pub fn new(providers: Vec<Box<dyn LlmProvider>>) -> Result<Self> {
        let mut providers = providers.into_iter();
        let Some(primary) = providers.next() else {
            bail!("A provider chain needs at least one provider");
        };
        Ok(Self {
            primary,
            backups: providers.collect(),
        })
    }

    fn len(&self) -> usize {
        1 + self.backups.len()
    }

    fn providers(&self) -> impl Iterator<Item = &dyn LlmProvider> {
        std::iter::once(self.primary.as_ref()).chain(self.backups.iter().map(|p| p.as_ref()))
    }
}

#[async_trait]
impl LlmProvider for ProviderChain {
    /// An explicit model in `request` is meant for the primary; backups run
    /// their own default model. A reply without text counts as a failure.
    async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
        let backup_request = ProviderRequest {
            model: String::new(),
            ..request.clone()
        };
        let mut failures: Vec<String> = Vec::new();

        for (position, provider) in self.providers().enumerate() {
            let attempt = if position == 0 { request } else { &backup_request };

            match provider.send_message(attempt).await {
                Ok(response) if !response.text.trim().is_empty() => {
                    if position > 0 {
                        tracing::info!(
                            "Backup provider {} answered after {} failure(s)",
                            provider.name(),
                            failures.len()
                        );
                    }
                    return Ok(response);
                }
                Ok(_) => {
                    tracing::warn!("Provider {} returned an empty reply", provider.name());
                    failures.push(format!("{}: empty reply", provider.name()));
                }
                Err(e) => {
                    tracing::warn!("Provider {} failed: {:#}", provider.name(), e);
                    failures.push(format!("{}: {:#}", provider.name(), e));
                }
            }
        }

        Err(anyhow!(
            "All {} providers failed ({})",
            self.len(),
            failures.join("; ")
        ))
    }

    fn name(&self) -> &str {
        self.primary.name()
    }

    fn default_model(&self) -> &str {
        self.primary.default_model()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::Message;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Replies from a script, one entry per call; `None` is a failure
    struct ScriptedProvider {
        name: &'static str,
        script: Mutex<Vec<Option<&'static str>>>,
        calls: Arc<AtomicUsize>,
        models: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedProvider {
        fn boxed(
            name: &'static str,
            script: Vec<Option<&'static str>>,
        ) -> (Box<dyn LlmProvider>, Arc<AtomicUsize>, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let models = Arc::new(Mutex::new(Vec::new()));
            let provider = Self {
                name,
                script: Mutex::new(script.into_iter().rev().collect()),
                calls: calls.clone(),
                models: models.clone(),
            };
            (Box::new(provider), calls, models)
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.models.lock().unwrap().push(request.model.clone());
            match self.script.lock().unwrap().pop().flatten() {
                Some(text) => Ok(ProviderResponse {
                    model: "scripted".to_string(),
                    text: text.to_string(),
                    stop_reason: None,
                    provider: self.name.to_string(),
                }),
                None => bail!("{} is unreachable", self.name),
            }
        }

        fn name(&self) -> &str {
            self.name
        }

        fn default_model(&self) -> &str {
            "scripted-default"
        }
    }

    fn request() -> ProviderRequest {
        ProviderRequest::new(vec![Message::user("oi")])
    }

    #[tokio::test]
    async fn test_primary_answer_skips_backups() {
        let (gemini, _, _) = ScriptedProvider::boxed("gemini", vec![Some("Olá!")]);
        let (claude, claude_calls, _) = ScriptedProvider::boxed("claude", vec![Some("Oi!")]);
        let chain = ProviderChain::new(vec![gemini, claude]).unwrap();

        let response = chain.send_message(&request()).await.unwrap();
        assert_eq!(response.provider, "gemini");
        assert_eq!(claude_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_each_turn_starts_at_the_primary() {
        let (gemini, gemini_calls, _) =
            ScriptedProvider::boxed("gemini", vec![None, Some("De volta.")]);
        let (claude, claude_calls, _) = ScriptedProvider::boxed("claude", vec![Some("Reserva.")]);
        let chain = ProviderChain::new(vec![gemini, claude]).unwrap();

        let first = chain.send_message(&request()).await.unwrap();
        assert_eq!(first.provider, "claude");

        let second = chain.send_message(&request()).await.unwrap();
        assert_eq!(second.provider, "gemini");
        assert_eq!(gemini_calls.load(Ordering::SeqCst), 2);
        assert_eq!(claude_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_moves_to_backup() {
        let (gemini, _, _) = ScriptedProvider::boxed("gemini", vec![Some("   ")]);
        let (claude, _, _) = ScriptedProvider::boxed("claude", vec![Some("Estou aqui.")]);
        let chain = ProviderChain::new(vec![gemini, claude]).unwrap();

        let response = chain.send_message(&request()).await.unwrap();
        assert_eq!(response.text, "Estou aqui.");
    }

    #[tokio::test]
    async fn test_explicit_model_only_reaches_primary() {
        let (gemini, _, gemini_models) = ScriptedProvider::boxed("gemini", vec![None]);
        let (claude, _, claude_models) = ScriptedProvider::boxed("claude", vec![Some("Oi.")]);
        let chain = ProviderChain::new(vec![gemini, claude]).unwrap();

        let request = request().with_model("gemini-1.5-pro");
        chain.send_message(&request).await.unwrap();

        assert_eq!(*gemini_models.lock().unwrap(), vec!["gemini-1.5-pro".to_string()]);
        assert_eq!(*claude_models.lock().unwrap(), vec![String::new()]);
    }

    #[tokio::test]
    async fn test_total_failure_names_every_provider() {
        let (gemini, _, _) = ScriptedProvider::boxed("gemini", vec![None]);
        let (claude, _, _) = ScriptedProvider::boxed("claude", vec![Some("")]);
        let chain = ProviderChain::new(vec![gemini, claude]).unwrap();

        let err = chain.send_message(&request()).await.unwrap_err().to_string();
        assert!(err.contains("All 2 providers failed"));
        assert!(err.contains("gemini: gemini is unreachable"));
        assert!(err.contains("claude: empty reply"));
    }

    #[test]
    fn test_chain_needs_a_provider() {
        assert!(ProviderChain::new(Vec::new()).is_err());

        let (gemini, _, _) = ScriptedProvider::boxed("gemini", vec![]);
        let chain = ProviderChain::new(vec![gemini]).unwrap();
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.name(), "gemini");
        assert_eq!(chain.default_model(), "scripted-default");
    }
}

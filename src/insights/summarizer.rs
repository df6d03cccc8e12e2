// Session summarizer
//
// Asks the remote model to compress a finished conversation into a couple of
// durable facts. There is no local fallback: without a provider, nothing is
// summarized.

use std::sync::Arc;

use crate::providers::{LlmProvider, Message, ProviderRequest};
use crate::store::ChatMessage;

/// Conversations shorter than this are not worth summarizing
pub const MIN_MESSAGES_FOR_SUMMARY: usize = 4;

/// Phrase the model answers with when nothing is worth keeping
pub const NOTHING_RELEVANT_MARKER: &str = "nada relevante";

const SUMMARY_INSTRUCTION: &str = "Analise a conversa abaixo entre um usuário e um assistente \
de apoio emocional. Extraia de 2 a 3 fatos concisos e duradouros sobre o usuário (preferências, \
situações de vida, gatilhos, estratégias que ajudam) que sejam úteis para personalizar conversas \
futuras. Responda apenas com os fatos, em uma única frase curta cada. Se não houver nada útil, \
responda exatamente: \"nada relevante\".";

#[derive(Clone, Default)]
pub struct SessionSummarizer {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl SessionSummarizer {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { provider }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Extract insight text from a conversation, or `None` when there is
    /// nothing to keep or the model is unavailable
    pub async fn summarize(&self, history: &[ChatMessage]) -> Option<String> {
        let provider = self.provider.as_ref()?;

        if history.len() < MIN_MESSAGES_FOR_SUMMARY {
            tracing::debug!(
                "Skipping summary: {} messages (need {})",
                history.len(),
                MIN_MESSAGES_FOR_SUMMARY
            );
            return None;
        }

        let request = ProviderRequest::new(vec![Message::user(format!(
            "{}\n\n{}",
            SUMMARY_INSTRUCTION,
            transcript(history)
        ))])
        .with_max_tokens(256)
        .with_temperature(0.2);

        match provider.send_message(&request).await {
            Ok(response) => {
                let text = response.text.trim();
                if text.is_empty() || text.to_lowercase().contains(NOTHING_RELEVANT_MARKER) {
                    tracing::info!("Session summary: nothing relevant");
                    None
                } else {
                    tracing::info!("Session summary extracted ({} chars)", text.len());
                    Some(text.to_string())
                }
            }
            Err(e) => {
                tracing::warn!("Session summary failed: {:#}", e);
                None
            }
        }
    }
}

fn transcript(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|msg| {
            let speaker = if msg.is_user { "Usuário" } else { "Assistente" };
            format!("{}: {}", speaker, msg.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderResponse;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: Result<String, String>,
        seen: Mutex<Vec<ProviderRequest>>,
    }

    impl ScriptedProvider {
        fn new(reply: Result<&str, &str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string).map_err(str::to_string),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn send_message(&self, request: &ProviderRequest) -> Result<ProviderResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(ProviderResponse {
                    model: "scripted".to_string(),
                    text: text.clone(),
                    stop_reason: None,
                    provider: "scripted".to_string(),
                }),
                Err(e) => anyhow::bail!("{}", e),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }

        fn default_model(&self) -> &str {
            "scripted"
        }
    }

    fn history(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| ChatMessage::new(format!("mensagem {}", i), i % 2 == 0))
            .collect()
    }

    #[tokio::test]
    async fn test_no_provider_returns_none() {
        let summarizer = SessionSummarizer::new(None);
        assert!(!summarizer.is_available());
        assert_eq!(summarizer.summarize(&history(10)).await, None);
    }

    #[tokio::test]
    async fn test_short_history_skips_provider() {
        let provider = ScriptedProvider::new(Ok("Gosta de correr."));
        let summarizer = SessionSummarizer::new(Some(provider.clone()));

        assert_eq!(summarizer.summarize(&history(3)).await, None);
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_marker_is_case_insensitive() {
        let provider = ScriptedProvider::new(Ok("  NADA RELEVANTE.  "));
        let summarizer = SessionSummarizer::new(Some(provider));
        assert_eq!(summarizer.summarize(&history(4)).await, None);
    }

    #[tokio::test]
    async fn test_summary_text_is_trimmed_and_transcript_sent() {
        let provider = ScriptedProvider::new(Ok("\nTrabalha à noite. Gosta de música.\n"));
        let summarizer = SessionSummarizer::new(Some(provider.clone()));

        let summary = summarizer.summarize(&history(4)).await;
        assert_eq!(summary.as_deref(), Some("Trabalha à noite. Gosta de música."));

        let seen = provider.seen.lock().unwrap();
        let prompt = &seen[0].messages[0].content;
        assert!(prompt.contains("Usuário: mensagem 0"));
        assert!(prompt.contains("Assistente: mensagem 1"));
    }

    #[tokio::test]
    async fn test_provider_error_returns_none() {
        let provider = ScriptedProvider::new(Err("quota exceeded"));
        let summarizer = SessionSummarizer::new(Some(provider));
        assert_eq!(summarizer.summarize(&history(6)).await, None);
    }
}

// Remote response generator
//
// Sends the conversation to an LLM provider. Any failure hands the same turn
// to the local generator; the next turn tries the provider again.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

use super::{LocalGenerator, Reply, ResponseStrategy, Turn};
use crate::prompt::SystemPrompt;
use crate::providers::{LlmProvider, Message, ProviderRequest};

const MAX_REPLY_TOKENS: u32 = 512;
const TEMPERATURE: f32 = 0.8;

pub struct RemoteGenerator {
    provider: Arc<dyn LlmProvider>,
    fallback: LocalGenerator,
}

impl RemoteGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, fallback: LocalGenerator) -> Self {
        Self { provider, fallback }
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Build the provider request for a turn: system prompt, replayed history,
    /// then the current text with its context prefix
    pub fn build_request(turn: &Turn<'_>) -> ProviderRequest {
        let mut messages: Vec<Message> = turn
            .history
            .iter()
            .map(|msg| {
                if msg.is_user {
                    Message::user(msg.text.clone())
                } else {
                    Message::model(msg.text.clone())
                }
            })
            .collect();

        messages.push(Message::user(format!(
            "{} {}",
            SystemPrompt::context_prefix(turn.verdict, turn.approach),
            turn.text
        )));

        ProviderRequest::new(messages)
            .with_system(SystemPrompt::build(turn.approach, turn.insights))
            .with_max_tokens(MAX_REPLY_TOKENS)
            .with_temperature(TEMPERATURE)
    }

    async fn try_remote(&self, turn: &Turn<'_>) -> Result<Reply> {
        let request = Self::build_request(turn);
        let response = self.provider.send_message(&request).await?;

        if response.text.trim().is_empty() {
            anyhow::bail!("{} returned an empty reply", response.provider);
        }

        Ok(Reply::remote(response.text))
    }
}

#[async_trait]
impl ResponseStrategy for RemoteGenerator {
    async fn respond(&self, turn: &Turn<'_>) -> Result<Reply> {
        if turn.verdict.is_crisis() {
            tracing::warn!("Crisis turn reached the remote generator; answering locally");
            return self.fallback.respond(turn).await;
        }

        match self.try_remote(turn).await {
            Ok(reply) => {
                tracing::info!("Remote reply from {}", self.provider.name());
                Ok(reply)
            }
            Err(e) => {
                tracing::warn!(
                    "Remote generation via {} failed, using local response: {:#}",
                    self.provider.name(),
                    e
                );
                self.fallback.respond(turn).await
            }
        }
    }

    fn name(&self) -> &str {
        "remote"
    }
}

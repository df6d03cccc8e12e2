// Text-to-speech output

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
    async fn stop(&self) -> Result<()>;
}

/// Speaker for environments without audio; only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeaker;

#[async_trait]
impl Speaker for SilentSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::debug!("speak ({} chars)", text.chars().count());
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        tracing::debug!("stop speaking");
        Ok(())
    }
}

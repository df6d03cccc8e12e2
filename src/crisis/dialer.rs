// Phone dialing

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::call_failed_message;

/// Result of a call attempt; failures carry a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    /// Message to show the user when the call failed
    pub fn user_message(&self, phone: &str) -> Option<String> {
        if self.success {
            return None;
        }
        Some(call_failed_message(
            phone,
            self.error.as_deref().unwrap_or("unknown error"),
        ))
    }
}

/// Places phone calls
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn make_call(&self, phone: &str) -> CallOutcome;
}

/// Dials by running an external command; `{phone}` in the template is
/// replaced by the sanitized number
#[derive(Debug, Clone)]
pub struct CommandDialer {
    template: String,
}

impl CommandDialer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Hand a tel: URI to the desktop's URL opener
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("open tel:{phone}")
        } else {
            Self::new("xdg-open tel:{phone}")
        }
    }

    fn command_line(&self, phone: &str) -> Vec<String> {
        let sanitized: String = phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        self.template
            .split_whitespace()
            .map(|part| part.replace("{phone}", &sanitized))
            .collect()
    }
}

#[async_trait]
impl Dialer for CommandDialer {
    async fn make_call(&self, phone: &str) -> CallOutcome {
        let parts = self.command_line(phone);
        let Some((program, args)) = parts.split_first() else {
            return CallOutcome::failed("no dial command configured");
        };

        match tokio::process::Command::new(program).args(args).status().await {
            Ok(status) if status.success() => CallOutcome::ok(),
            Ok(status) => CallOutcome::failed(format!("dial command exited with {}", status)),
            Err(e) => CallOutcome::failed(format!("dialer unavailable ({}): {}", program, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_substitutes_sanitized_phone() {
        let dialer = CommandDialer::new("termux-telephony-call {phone}");
        assert_eq!(
            dialer.command_line("+55 (11) 9999-0000; rm -rf /"),
            vec!["termux-telephony-call".to_string(), "+551199990000".to_string()]
        );
    }

    #[tokio::test]
    async fn test_missing_program_reports_failure() {
        let dialer = CommandDialer::new("/nonexistent/acolhe-dialer {phone}");
        let outcome = dialer.make_call("188").await;

        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("dialer unavailable"));
    }

    #[tokio::test]
    async fn test_empty_template_fails() {
        let outcome = CommandDialer::new("   ").make_call("188").await;
        assert_eq!(outcome, CallOutcome::failed("no dial command configured"));
    }

    #[test]
    fn test_user_message_only_on_failure() {
        assert!(CallOutcome::ok().user_message("188").is_none());
        let msg = CallOutcome::failed("busy").user_message("188").unwrap();
        assert!(msg.contains("busy"));
    }
}

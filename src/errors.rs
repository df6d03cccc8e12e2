// Errors and user-facing messages
//
// Typed errors for the contact book, plus helpers that turn configuration and
// call failures into actionable messages. Messages follow LANG: Portuguese
// for pt_*, English otherwise.

use anyhow::{Context, Result};
use thiserror::Error;

/// Errors raised when editing emergency contacts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContactError {
    #[error("contact '{0}' is permanent and cannot be removed")]
    Permanent(String),

    #[error("no contact with id '{0}'")]
    NotFound(String),

    #[error("phone number must contain digits (got '{0}')")]
    InvalidPhone(String),
}

fn get_locale() -> &'static str {
    match std::env::var("LANG") {
        Ok(lang) if lang.starts_with("pt") => "pt",
        _ => "en",
    }
}

/// Localized text helper
fn t(key: &str) -> &'static str {
    match (get_locale(), key) {
        ("pt", "try") => "Tente:",
        ("pt", "suggestion") => "Sugestão",
        ("pt", "call_failed") => "Não foi possível ligar para",
        ("pt", "call_hint") => "Ligue manualmente para o CVV (188) ou o SAMU (192).",

        (_, "try") => "Try:",
        (_, "suggestion") => "Suggestion",
        (_, "call_failed") => "Could not place a call to",
        (_, "call_hint") => "Dial CVV (188) or SAMU (192) manually.",
        _ => "",
    }
}

/// Wrap an error with user-friendly context
pub trait UserFriendlyError {
    /// Add user-friendly context with a suggestion
    fn user_context_with_suggestion(self, problem: &str, suggestion: &str) -> Self;
}

impl<T> UserFriendlyError for Result<T> {
    fn user_context_with_suggestion(self, problem: &str, suggestion: &str) -> Self {
        self.with_context(|| {
            format!(
                "{}\n\n\x1b[1;33m{}:\x1b[0m {}",
                problem,
                t("suggestion"),
                suggestion
            )
        })
    }
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(error: &str) -> String {
    format!(
        "Failed to parse config file\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32m{}\x1b[0m\n\
        1. Check config file syntax:\n\
           \x1b[36mcat ~/.acolhe/config.toml\x1b[0m\n\n\
        2. Common mistakes:\n\
           • Missing quotes around strings\n\
           • [[providers]] entries without api_key\n\
           • Unclosed brackets []",
        error,
        t("try")
    )
}

/// Format a missing API key error
pub fn api_key_missing_error(provider: &str) -> String {
    format!(
        "{} API key is empty\n\n\
        \x1b[1;32m{}\x1b[0m\n\
        1. Set api_key for the provider in ~/.acolhe/config.toml\n\
        2. Or remove the [[providers]] entry to run with local responses only\n\
        3. Or export GEMINI_API_KEY=\"...\"",
        provider,
        t("try")
    )
}

/// Message shown to the user when an emergency call could not be placed
pub fn call_failed_message(phone: &str, error: &str) -> String {
    format!("{} {}: {}. {}", t("call_failed"), phone, error, t("call_hint"))
}

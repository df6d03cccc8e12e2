// Acolhe - emotional-support companion core
// Main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use acolhe::approach::Approach;
use acolhe::companion::{ChatSession, Companion, TurnOutcome};
use acolhe::config::{load_config, Config};
use acolhe::crisis::{CommandDialer, Dialer, EscalationPlan};
use acolhe::errors::UserFriendlyError;
use acolhe::metrics::MetricsLogger;
use acolhe::sentiment::SentimentClassifier;
use acolhe::store::{ContactStore, LocalStore};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{reload, EnvFilter, Registry};

type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

#[derive(Parser, Debug)]
#[command(name = "acolhe")]
#[command(about = "Emotional-support companion: sentiment triage, crisis escalation and responses", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Start an interactive conversation on stdin
    Chat {
        /// Therapeutic approach for this session (defaults to the saved one)
        #[arg(long, value_parser = parse_approach)]
        approach: Option<Approach>,
    },
    /// Classify a text and print the verdict as JSON
    Classify {
        /// Text to classify
        text: String,
    },
    /// Manage emergency contacts
    Contacts {
        #[command(subcommand)]
        action: ContactsCommand,
    },
    /// Show today's turn metrics
    Metrics,
}

#[derive(Parser, Debug)]
enum ContactsCommand {
    /// List all contacts, permanent first
    List,
    /// Add a personal contact
    Add { name: String, phone: String },
    /// Remove a personal contact by id
    Remove { id: String },
}

fn parse_approach(s: &str) -> std::result::Result<Approach, String> {
    s.parse::<Approach>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing first, so config loading can log
    let log_filter = init_tracing();
    let config = load_config()?;
    if config.features.debug_logging {
        enable_debug_logging(&log_filter);
    }

    match args.command {
        Command::Chat { approach } => run_chat(&config, approach).await,
        Command::Classify { text } => run_classify(&config, &text),
        Command::Contacts { action } => run_contacts(&config, action).await,
        Command::Metrics => run_metrics(&config),
    }
}

/// Initialize tracing on stderr
///
/// Default level is info; RUST_LOG overrides it and ACOLHE_DEBUG=1 forces
/// debug. The returned handle lets `features.debug_logging` raise the level
/// once the config has been read.
fn init_tracing() -> LogFilterHandle {
    let show_debug = std::env::var("ACOLHE_DEBUG")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);

    let env_filter = if show_debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let (filter_layer, handle) = reload::Layer::new(env_filter);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Bridge log crate → tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();

    handle
}

fn enable_debug_logging(handle: &LogFilterHandle) {
    match handle.modify(|filter| *filter = EnvFilter::new("debug")) {
        Ok(()) => tracing::debug!("Debug logging enabled by config"),
        Err(e) => tracing::warn!("Could not enable debug logging: {}", e),
    }
}

async fn open_store(config: &Config) -> Result<Arc<LocalStore>> {
    let store = LocalStore::open(config.store_path())
        .await
        .user_context_with_suggestion(
            "Could not open the local data store",
            &format!("Move or delete {} to start fresh", config.store_path().display()),
        )?;
    Ok(Arc::new(store))
}

fn dialer(config: &Config) -> Arc<dyn Dialer> {
    match &config.crisis.dial_command {
        Some(template) => Arc::new(CommandDialer::new(template.clone())),
        None => Arc::new(CommandDialer::platform_default()),
    }
}

async fn run_chat(config: &Config, approach: Option<Approach>) -> Result<()> {
    let store = open_store(config).await?;
    let companion = Companion::from_config(config, store)?;
    let dialer = dialer(config);

    let mut session = companion.start_session().await?;
    if let Some(approach) = approach {
        companion.set_approach(&mut session, approach).await?;
    }

    println!(
        "Acolhe ({} | abordagem: {}). Comandos: /reset, /approach <id>, /quit",
        companion.strategy_name(),
        session.approach
    );
    println!("Em caso de emergência: CVV 188 | SAMU 192\n");

    let mut pending_calls: Vec<JoinHandle<()>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if input == "/quit" {
            break;
        }

        if input == "/reset" {
            match companion.reset_session(&mut session).await? {
                Some(insight) => println!("Sessão encerrada. Vou lembrar: {}\n", insight),
                None => println!("Sessão encerrada.\n"),
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("/approach") {
            handle_approach_command(&companion, &mut session, rest.trim()).await?;
            continue;
        }

        let outcome = match companion.handle_message(&mut session, input).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Turn failed: {:#}", e);
                println!("\nDesculpe, não consegui responder agora. Em caso de emergência: CVV 188 | SAMU 192\n");
                continue;
            }
        };
        print_outcome(&outcome);

        if let Some(plan) = outcome.escalation {
            pending_calls.push(start_auto_dial(plan, dialer.clone()));
        }
    }

    // An auto-dial already announced to the user still goes through
    for call in pending_calls {
        let _ = call.await;
    }

    Ok(())
}

async fn handle_approach_command(
    companion: &Companion,
    session: &mut ChatSession,
    arg: &str,
) -> Result<()> {
    if arg.is_empty() {
        for approach in Approach::ALL {
            println!("{}", format_approach_line(approach, session.approach));
        }
        println!();
        return Ok(());
    }

    match arg.parse::<Approach>() {
        Ok(approach) => {
            companion.set_approach(session, approach).await?;
            println!("Abordagem: {}\n", approach.description());
        }
        Err(e) => println!("{}\n", e),
    }
    Ok(())
}

/// One `/approach` listing row: current marker, id, kind, description
fn format_approach_line(approach: Approach, current: Approach) -> String {
    let marker = if approach == current { "*" } else { " " };
    let kind = if approach.is_persona() { "persona" } else { "abordagem" };
    format!("{} {:<15} {:<10} {}", marker, approach.id(), kind, approach.description())
}

fn print_outcome(outcome: &TurnOutcome) {
    println!("\n{}", outcome.reply.text);

    if let Some(follow_up) = &outcome.reply.follow_up {
        println!("{}", follow_up);
    }

    if !outcome.reply.suggestions.is_empty() {
        println!("\nSugestões:");
        for suggestion in &outcome.reply.suggestions {
            println!("  • {}", suggestion);
        }
    }

    if let Some(plan) = &outcome.escalation {
        println!("\nContatos de emergência:");
        for contact in &plan.chips {
            println!("  [{}] {}", contact.phone, contact.name);
        }
        println!(
            "Ligando para {} ({}) em {} segundos...",
            plan.dial_target.name,
            plan.dial_target.phone,
            plan.delay.as_secs()
        );
    }
    println!();
}

fn start_auto_dial(plan: EscalationPlan, dialer: Arc<dyn Dialer>) -> JoinHandle<()> {
    let phone = plan.dial_target.phone.clone();
    let call = plan.spawn(dialer);

    tokio::spawn(async move {
        match call.await {
            Ok(outcome) => {
                if let Some(message) = outcome.user_message(&phone) {
                    eprintln!("\n{}\n", message);
                }
            }
            Err(e) => tracing::error!("Auto-dial task failed: {}", e),
        }
    })
}

fn run_classify(config: &Config, text: &str) -> Result<()> {
    let lexicon = match &config.lexicon_path {
        Some(path) => acolhe::lexicon::Lexicon::load_from_file(path)?,
        None => acolhe::lexicon::Lexicon::default(),
    };
    let verdict = SentimentClassifier::new(Arc::new(lexicon)).classify(text);
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

async fn run_contacts(config: &Config, action: ContactsCommand) -> Result<()> {
    let store = open_store(config).await?;
    let mut book = store.get_emergency_contacts().await?;

    match action {
        ContactsCommand::List => {
            for contact in book.all() {
                let kind = if contact.is_permanent { "fixo" } else { "pessoal" };
                println!("{:<38} {:<40} {:<16} {}", contact.id, contact.name, contact.phone, kind);
            }
        }
        ContactsCommand::Add { name, phone } => {
            let contact = book.add_personal(name, phone)?;
            store.save_emergency_contacts(&book).await?;
            println!("Added {} ({}) with id {}", contact.name, contact.phone, contact.id);
        }
        ContactsCommand::Remove { id } => {
            let contact = book.remove(&id)?;
            store.save_emergency_contacts(&book).await?;
            println!("Removed {} ({})", contact.name, contact.phone);
        }
    }
    Ok(())
}

fn run_metrics(config: &Config) -> Result<()> {
    let logger = MetricsLogger::new(config.metrics_dir())?;
    let summary = logger.get_today_summary()?;

    let pct = |count: usize| {
        if summary.total > 0 {
            (count as f64 / summary.total as f64) * 100.0
        } else {
            0.0
        }
    };

    println!(
        "Metrics (today):\n\
        Total turns: {}\n\
        Remote: {} ({:.1}%)\n\
        Local: {} ({:.1}%)\n\
          - Fallbacks: {} ({:.1}%)\n\
        Crisis: {} ({:.1}%)\n\
        Avg response time: {}ms",
        summary.total,
        summary.remote_count,
        pct(summary.remote_count),
        summary.local_count,
        pct(summary.local_count),
        summary.fallback_count,
        pct(summary.fallback_count),
        summary.crisis_count,
        pct(summary.crisis_count),
        summary.avg_response_time_ms
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_listing_tags_personas() {
        let friend = format_approach_line(Approach::Friend, Approach::General);
        assert!(friend.starts_with("  friend"));
        assert!(friend.contains("persona"));

        let cbt = format_approach_line(Approach::Cbt, Approach::Cbt);
        assert!(cbt.starts_with("* cbt"));
        assert!(cbt.contains("abordagem"));
        assert!(!cbt.contains("persona "));
    }

    #[test]
    fn test_debug_logging_can_be_enabled_after_init() {
        let (filter_layer, handle) = reload::Layer::new(EnvFilter::new("info"));
        let subscriber = tracing_subscriber::registry().with(filter_layer);

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(tracing::Level::INFO));
            assert!(!tracing::enabled!(tracing::Level::DEBUG));

            enable_debug_logging(&handle);
            assert!(tracing::enabled!(tracing::Level::DEBUG));
        });
    }
}

//! icebreaker: score opening lines from the command line
//!
//! Stands in for the dashboard's message box: type a message, get the
//! verdict.

use std::io::{self, IsTerminal, Read, Write};
use std::process;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use icebreaker::{
    BuildInfo, ClassificationResult, Config, IcebreakerError, ScoringService, UNAVAILABLE_MESSAGE,
    load_classifier,
};

/// Icebreaker CLI
#[derive(Parser)]
#[command(name = "icebreaker")]
#[command(version = icebreaker::PKG_VERSION)]
#[command(about = "Predict whether an opening line gets a response")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model bundle directory (overrides config).
    #[arg(short, long, env = "ICEBREAKER_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a single message
    Score {
        /// Message to score (or omit to read from stdin)
        text: Option<String>,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score messages line by line as they are typed
    Interactive,

    /// Show the loaded model and build
    Info {
        /// Print build metadata as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_overrides(args.model_dir, None);

    // Startup failures abort here; nothing is scored with a half-loaded model.
    let model_config = config.model.clone();
    let classifier = tokio::task::spawn_blocking(move || load_classifier(&model_config))
        .await
        .map_err(|e| IcebreakerError::Configuration(format!("model loader failed: {e}")))??;

    info!(version = icebreaker::version_string(), "icebreaker ready");
    let service = ScoringService::new(Arc::new(classifier), config.limits.request_timeout());

    match args.command {
        Command::Score { text, json } => {
            let text = resolve_text(text)?;
            let outcome = service.classify(&text).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&render_json(&outcome))?);
            } else {
                println!("{}", render(&outcome));
            }
            if outcome.is_err() {
                process::exit(1);
            }
        }

        Command::Interactive => {
            let prompt = io::stdin().is_terminal();
            if prompt {
                eprintln!("Type an opening line and press enter (Ctrl-D to quit).");
            }
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                if prompt {
                    eprint!("> ");
                    io::stderr().flush()?;
                }
                let Some(line) = lines.next_line().await? else {
                    break;
                };
                let outcome = service.classify(line.trim_end_matches('\r')).await;
                println!("{}", render(&outcome));
            }
        }

        Command::Info { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&BuildInfo::current())?);
                return Ok(());
            }
            let classifier = service.classifier();
            println!("icebreaker {}", icebreaker::version_string());
            println!("encoder:     {}", classifier.encoder_name());
            println!("hidden size: {}", classifier.hidden_size());
            println!("max length:  {}", classifier.max_length());
            println!("timeout:     {:?}", service.timeout());
        }
    }

    Ok(())
}

/// Verdict text for a scoring outcome.
///
/// Failures show a generic notice, never a label.
fn render(outcome: &icebreaker::Result<ClassificationResult>) -> String {
    match outcome {
        Ok(result) => format!(
            "You will get a response of:\n{} ({:.0}% sure)",
            result.label.message(),
            result.confidence() * 100.0
        ),
        Err(e) => {
            tracing::warn!(error = %e, "classification failed");
            UNAVAILABLE_MESSAGE.to_string()
        }
    }
}

/// JSON form of a scoring outcome for `score --json`.
///
/// Failures carry the same notice as the text output plus the cause.
fn render_json(outcome: &icebreaker::Result<ClassificationResult>) -> serde_json::Value {
    match outcome {
        Ok(result) => json!(result),
        Err(e) => json!({
            "error": UNAVAILABLE_MESSAGE,
            "detail": e.to_string(),
        }),
    }
}

/// Resolve text input from an optional CLI argument or stdin.
///
/// Empty input is valid and gets scored like any other message.
fn resolve_text(arg: Option<String>) -> Result<String, Box<dyn std::error::Error>> {
    if let Some(text) = arg {
        return Ok(text);
    }
    if io::stdin().is_terminal() {
        return Err("score: no input provided (pass text as argument or via stdin)".into());
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use icebreaker::{IcebreakerError, Label};

    use super::*;

    fn scored() -> ClassificationResult {
        ClassificationResult::from_logits([0.0, 2.0])
    }

    #[test]
    fn render_shows_verdict() {
        let text = render(&Ok(scored()));
        assert!(text.starts_with("You will get a response of:\n"));
        assert!(text.contains(Label::Positive.message()));
    }

    #[test]
    fn render_shows_notice_on_failure() {
        let text = render(&Err(IcebreakerError::Inference("oom".into())));
        assert_eq!(text, UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn json_output_carries_result() {
        let value = render_json(&Ok(scored()));
        assert_eq!(value["label"], "POSITIVE");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn json_output_on_timeout_shows_notice() {
        let value = render_json(&Err(IcebreakerError::Timeout(Duration::from_secs(3))));
        assert_eq!(value["error"], UNAVAILABLE_MESSAGE);
        assert!(value["detail"].as_str().unwrap().contains("timed out"));
        assert!(value.get("label").is_none());
    }
}

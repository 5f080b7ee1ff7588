//! SupportLine CLI
//!
//! Classifies a customer support message from the terminal and prints its
//! category, sentiment, and suggested auto-reply.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use supportline_classifier::{shared_client, Credentials, SupportClassifier};
use supportline_core::ClassificationRequest;
use tracing::{debug, info, warn};

mod config;
mod output;

use config::Overrides;

#[derive(Parser, Debug)]
#[command(name = "supportline")]
#[command(
    author,
    version,
    about = "Classify customer support messages and draft a reply"
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a message (read from stdin when omitted)
    Classify {
        /// Customer message
        message: Option<String>,

        /// Configuration file path
        #[arg(short, long, default_value = "supportline.yaml")]
        config: String,

        /// Model identifier
        #[arg(short, long, env = "SUPPORTLINE_MODEL")]
        model: Option<String>,

        /// Temperature for the first attempt
        #[arg(short, long, env = "SUPPORTLINE_TEMPERATURE")]
        temperature: Option<f32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the allowed categories and sentiments
    Labels {
        /// Print the labels as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed arguments
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Classify {
            message,
            config,
            model,
            temperature,
            json,
        } => {
            let overrides = Overrides { model, temperature };
            classify(message, &config, &overrides, json).await
        }
        Commands::Labels { json } => {
            println!("{}", output::render_labels(json)?);
            Ok(())
        }
    }
}

async fn classify(
    message: Option<String>,
    config_path: &str,
    overrides: &Overrides,
    json: bool,
) -> Result<()> {
    let message = match message {
        Some(message) if message != "-" => message,
        _ => read_stdin()?,
    };
    let request = ClassificationRequest::new(&message)?;

    let config = config::load(config_path, overrides)?;
    info!("Using model {}", config.model);

    if !Credentials::from_env().is_explicit() {
        warn!(
            "API key not found. Set GEMINI_API_KEY (or GOOGLE_API_KEY) in your environment \
             or in a .env file, e.g. GEMINI_API_KEY=your_key"
        );
    }

    let client = shared_client(&config.model_settings())?;
    let classifier = SupportClassifier::new(client, config)?;

    let outcome = classifier
        .classify_detailed(&request)
        .await
        .context("Classification failed")?;
    debug!(
        resolution = outcome.resolution.as_str(),
        attempts = outcome.attempts,
        latency_us = outcome.latency_us,
        "Classification complete"
    );

    let rendered = if json {
        output::render_json(&outcome.result)?
    } else {
        output::render_text(&outcome.result)
    };
    println!("{rendered}");

    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read message from stdin")?;
    Ok(buffer)
}

/// Initialize tracing/logging on stderr so stdout stays parseable
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("supportline=debug,supportline_classifier=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("supportline=info,supportline_classifier=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

//! Leadline command-line entry point
//!
//! Serves the HTTP API or runs single pipeline operations against the
//! configured store.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use leadline_server::config::{ProviderKind, ServerConfig};
use leadline_server::handlers::LeadView;
use leadline_server::{build_pipeline, init_tracing, start_server};
use std::io::Read;
use std::path::PathBuf;

/// Leadline - turn meeting summaries into CRM leads.
#[derive(Debug, Parser)]
#[command(name = "leadline")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "LEADLINE_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true)]
    database: Option<String>,

    /// Extraction model identifier
    #[arg(long, global = true)]
    model: Option<String>,

    /// Extraction provider (openai, ollama)
    #[arg(long, global = true)]
    provider: Option<ProviderKind>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        /// Listen address (e.g., 0.0.0.0:8000)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Process one summary and print the result as JSON
    Process {
        /// File holding the summary, or "-" for stdin
        input: String,
    },

    /// List stored leads as JSON
    Leads {
        /// Maximum number of leads to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show lead statistics as JSON
    Stats,

    /// Delete every stored lead
    Clear,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    let mut config =
        ServerConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(database) = cli.database {
        config.database = database;
    }
    if let Some(model) = cli.model {
        config.llm.model = model;
    }
    if let Some(provider) = cli.provider {
        config.llm.provider = provider;
    }

    match cli.command {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            start_server(config).await?;
        }
        Command::Process { input } => {
            let summary = read_input(&input)?;
            let pipeline = build_pipeline(&config)?;
            let result = pipeline.process(&summary).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.success {
                bail!(
                    "{}",
                    result.error.as_deref().unwrap_or("extraction failed")
                );
            }
        }
        Command::Leads { limit } => {
            let pipeline = build_pipeline(&config)?;
            let leads: Vec<LeadView> = pipeline
                .list_leads(limit)
                .await?
                .into_iter()
                .map(LeadView::from)
                .collect();
            println!("{}", serde_json::to_string_pretty(&leads)?);
        }
        Command::Stats => {
            let pipeline = build_pipeline(&config)?;
            let stats = pipeline.stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Clear => {
            let pipeline = build_pipeline(&config)?;
            let deleted = pipeline.clear().await?;
            println!("Deleted {} leads", deleted);
        }
    }

    Ok(())
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read summary from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input))
    }
}

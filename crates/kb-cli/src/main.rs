//! Knowledge-base CLI
//!
//! # Usage
//!
//! ```bash
//! kb ask "do you allow pets"
//! kb warm
//! kb sections
//! kb schema
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (~/.config/assistant-kb/config.toml)
//! 3. CLI-specified config file (--config)
//! 4. Environment variables (KB_*)
//! 5. CLI flags

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use kb_engine::{knowledge_base_tool, Engine};
use kb_index::load_corpus;
use kb_types::Settings;

#[derive(Parser)]
#[command(
    name = "kb",
    about = "Semantic knowledge-base retrieval for the assistant",
    version
)]
struct Cli {
    /// Path to a config file (overrides the default location)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Path to the knowledge-base corpus file
    #[arg(long, global = true)]
    corpus: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the knowledge base a question
    Ask {
        /// The question, in natural language
        query: Vec<String>,
    },
    /// Load the corpus and model and build the index eagerly
    Warm,
    /// List the sections parsed from the corpus
    Sections,
    /// Print the tool-calling descriptor as JSON
    Schema,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(corpus) = cli.corpus {
        settings.corpus_path = corpus;
    }
    if let Some(log_level) = cli.log_level {
        settings.log_level = log_level;
    }

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Ask { query } => {
            let query = query.join(" ");
            let engine = Engine::new(&settings);
            println!("{}", engine.answer(&query));
        }
        Commands::Warm => {
            let engine = Engine::new(&settings);
            engine.warm().context("Knowledge base build failed")?;
            info!(
                sections = engine.section_count().unwrap_or(0),
                "Knowledge base ready"
            );
        }
        Commands::Sections => {
            let sections = load_corpus(&settings.expanded_corpus_path())
                .context("Failed to load corpus")?;
            for section in &sections {
                println!("[{}] {}", section.index, section.text);
            }
        }
        Commands::Schema => {
            let descriptor = knowledge_base_tool();
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
    }

    Ok(())
}

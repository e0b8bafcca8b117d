//! # twinchat CLI
//!
//! Terminal front-end for the twinchat engine.
//!
//! ## Usage
//!
//! ```bash
//! twinchat --config ./twinchat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `twinchat ask "<message>"` | One-shot reply for a single message |
//! | `twinchat chat` | Interactive session (`/clear` resets memory, `/quit` exits) |
//! | `twinchat search "<query>"` | Show the chunks retrieval would feed the model |

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use twinchat::chat::ChatEngine;
use twinchat::completion::CompletionGateway;
use twinchat::config::{self, Config};
use twinchat::search::Retriever;
use twinchat::store::DocumentStore;

/// twinchat — a retrieval-augmented digital companion chat engine.
///
/// All commands accept a `--config` flag pointing to a TOML
/// configuration file; when the file is missing, built-in defaults are
/// used (knowledge base in `./knowledge_base`, no API token).
#[derive(Parser)]
#[command(
    name = "twinchat",
    about = "A retrieval-augmented digital companion chat engine",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./twinchat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get a single reply and exit.
    Ask {
        /// The message to respond to.
        message: String,
    },

    /// Start an interactive chat session.
    ///
    /// Type `/clear` to forget the conversation so far and `/quit`
    /// (or press Ctrl-D) to leave.
    Chat,

    /// Show the knowledge-base chunks retrieved for a query.
    ///
    /// Prints what would be fed to the model as context, best match
    /// first. Useful for checking what the knowledge base covers.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of chunks to show.
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        Config::minimal()
    };

    // The gateway itself never reads the environment; seed the token
    // here when the config file leaves it unset.
    if cfg.completion.api_token.is_none() {
        cfg.completion.api_token = std::env::var("HF_TOKEN").ok();
    }

    let store = Arc::new(DocumentStore::load(
        &cfg.knowledge.root,
        cfg.knowledge.chunk_size,
        cfg.knowledge.overlap,
    )?);

    match cli.command {
        Commands::Ask { message } => {
            let mut engine = build_engine(store, &cfg)?;
            let reply = engine.get_response(&message).await;
            println!("{}", reply);
        }
        Commands::Chat => {
            let mut engine = build_engine(store, &cfg)?;
            run_repl(&mut engine).await?;
        }
        Commands::Search { query, limit } => {
            let retriever = Retriever::new(store);
            let k = limit.unwrap_or(cfg.retrieval.top_k);
            let results = retriever.search(&query, k);
            if results.is_empty() {
                println!("No matching chunks.");
            }
            for (rank, chunk) in results.iter().enumerate() {
                let preview: String = chunk.content.chars().take(240).collect();
                println!("{}. [{}] {}", rank + 1, chunk.source, preview);
            }
        }
    }

    Ok(())
}

fn build_engine(store: Arc<DocumentStore>, cfg: &Config) -> Result<ChatEngine> {
    let retriever = Retriever::new(store);
    let gateway = CompletionGateway::new(&cfg.completion)?;
    Ok(ChatEngine::new(
        retriever,
        gateway,
        cfg.chat.max_history_turns,
        cfg.retrieval.top_k,
    ))
}

async fn run_repl(engine: &mut ChatEngine) -> Result<()> {
    println!("twinchat — /clear to reset memory, /quit to exit");

    let stdin = std::io::stdin();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }

        let input = line.trim();
        match input {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                engine.clear_memory();
                println!("(memory cleared)");
            }
            _ => {
                let reply = engine.get_response(input).await;
                println!("her> {}", reply);
            }
        }
    }

    Ok(())
}

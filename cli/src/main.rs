use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use docsearch::{build_engine, read_config, render_hits, render_skipped, run_repl};
use docsearch_core::{CombinePolicy, EngineConfig, Field};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Keyword search over a directory of text documents", long_about = None)]
struct Cli {
    /// JSON engine configuration; flags below override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Corpus {
    /// Directory of documents (first line of each file is its title)
    #[arg(long, default_value = "documents")]
    docs: PathBuf,
    /// How multi-word queries combine: union or intersection
    #[arg(long)]
    policy: Option<CombinePolicy>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single query and print the matches
    Search {
        #[command(flatten)]
        corpus: Corpus,
        /// Field to search: title or content
        #[arg(long, default_value = "content")]
        field: Field,
        #[arg(long)]
        query: String,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Interactive search session
    Repl {
        #[command(flatten)]
        corpus: Corpus,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Search { corpus, field, query, json } => {
            if let Some(policy) = corpus.policy {
                config.policy = policy;
            }
            let (engine, report) = build_engine(config, &corpus.docs)?;
            render_skipped(&mut io::stderr().lock(), &report)?;
            let ids = engine.search(&query, field);
            let hits = engine.hits(&ids, field);
            if json {
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                println!("Query: '{query}' (Search by: {field})");
                render_hits(&mut io::stdout().lock(), &hits)?;
            }
        }
        Commands::Repl { corpus } => {
            if let Some(policy) = corpus.policy {
                config.policy = policy;
            }
            let (engine, report) = build_engine(config, &corpus.docs)?;
            tracing::info!(loaded = report.loaded, skipped = report.skipped.len(), "documents loaded");
            render_skipped(&mut io::stderr().lock(), &report)?;
            run_repl(&engine, io::stdin().lock(), io::stdout().lock())?;
        }
    }
    Ok(())
}

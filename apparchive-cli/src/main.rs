mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(
        short,
        long,
        global = true,
        default_value = "info",
        ignore_case = true,
        value_parser = LOG_LEVELS
    )]
    log_level: String,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the entries of an archive and how they would be classified
    Inspect {
        archive: PathBuf,
        #[clap(long)]
        json: bool,
    },
    /// Dry-run a project import into an in-memory backend
    Import {
        archive: PathBuf,
        #[clap(long)]
        owner: String,
        #[clap(long)]
        email: String,
        #[clap(short, long)]
        name: String,
        /// Remix history to attach to the new project
        #[clap(long)]
        history: Option<PathBuf>,
        /// TOML importer configuration; falls back to the environment
        #[clap(short, long)]
        config: Option<PathBuf>,
    },
    /// Print freshly generated screen rename tokens
    Token {
        #[clap(short, long, default_value = "1")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logging(&args.log_level);

    match args.command {
        Commands::Inspect { archive, json } => commands::inspect(&archive, json)?,
        Commands::Import {
            archive,
            owner,
            email,
            name,
            history,
            config,
        } => commands::import(commands::ImportArgs {
            archive,
            owner,
            email,
            name,
            history,
            config,
        })?,
        Commands::Token { count } => commands::tokens(count),
    }

    Ok(())
}

fn setup_logging(log_level: &str) {
    // Engine and CLI both log under the `apparchive` target.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "apparchive={}",
            log_level.to_lowercase()
        )))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

//! tagbayes CLI - train naive-Bayes character scoring models from tagged corpora.
//!
//! tagbayes reads sharded post metadata, counts how often each general tag
//! co-occurs with each character tag, and writes a compressed `.npz` model
//! holding log-odds weights and per-character biases.
//!
//! # Usage
//!
//! ```bash
//! # Train a model
//! tagbayes train metadata/ -g general.txt -c character.txt -m mapping.json -o naive_bayes.npz
//!
//! # Count shards on eight workers, without calibration
//! tagbayes train metadata/ -g general.txt -c character.txt -p 8 --no-calibration -o model.npz
//!
//! # View configuration
//! tagbayes config show
//! ```

use clap::{Parser, Subcommand};
use tagbayes_core::{Config, ConfigError};

mod cli;
mod logging;

/// tagbayes - Naive-Bayes character scoring from tag co-occurrence.
#[derive(Parser, Debug)]
#[command(name = "tagbayes")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Count a tagged corpus and write a character scoring model
    Train(cli::train::TrainArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = startup_config(Config::load(), &cli.command)?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("tagbayes v{}", tagbayes_core::VERSION);

    match cli.command {
        Commands::Train(args) => cli::train::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

/// Settle the configuration a command runs with.
///
/// A missing file already loads as defaults. A file that fails to read, parse
/// or validate stops `train`; `config` subcommands fall back to defaults so the
/// file can still be located and rewritten.
fn startup_config(
    loaded: Result<Config, ConfigError>,
    command: &Commands,
) -> anyhow::Result<Config> {
    match (loaded, command) {
        (Ok(config), _) => Ok(config),
        (Err(e), Commands::Config(_)) => {
            // Logging isn't initialized yet.
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `tagbayes config path`."
            );
            Ok(Config::default())
        }
        (Err(e), Commands::Train(_)) => Err(anyhow::Error::new(e).context(format!(
            "Invalid config file {}\n\n  \
             Hint: Fix it or regenerate it with `tagbayes config init --force`.",
            Config::default_path().display()
        ))),
    }
}

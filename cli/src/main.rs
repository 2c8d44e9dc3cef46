//! Gentleman State CLI - Command Line Interface

use clap::{Parser, Subcommand};
use gentleman_cli::commands;
use gentleman_index::IndexKey;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "gentleman")]
#[command(about = "Gentleman State - observable state slices")]
#[command(version)]
struct Cli {
    /// Seed file (defaults to the built-in index store)
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Log level, overrides the seed file
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the default seed configuration
    Defaults {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show one slice, or every slice
    Show {
        /// Slice key: user, company or settings
        key: Option<IndexKey>,
    },

    /// Show one property of a slice
    Get {
        /// Slice key
        key: IndexKey,

        /// Property name
        property: String,
    },

    /// Write to a slice and print what a watcher receives
    Set {
        /// Slice key
        key: IndexKey,

        /// JSON value, a partial record unless --property names an existing property
        value: String,

        /// Property to replace
        #[arg(short, long)]
        property: Option<String>,

        /// Write without notifying watchers
        #[arg(long)]
        silent: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let seed = commands::load_seed(cli.seed.as_deref())?;

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(&seed.store.log_level);
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Defaults { output } => {
            let json = seed.to_json()?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &json)?;
                    println!("Seed configuration saved to: {}", path.display());
                }
                None => {
                    println!("{}", json);
                }
            }
        }

        Commands::Show { key } => {
            let store = seed.build();
            println!("{}", commands::show(&store, key)?);
        }

        Commands::Get { key, property } => {
            let store = seed.build();
            println!("{}", commands::get(&store, key, &property)?);
        }

        Commands::Set {
            key,
            value,
            property,
            silent,
        } => {
            let store = seed.build();
            let outcome =
                commands::set(&store, key, &value, property.as_deref(), !silent)?;

            info!(%key, emissions = outcome.emissions.len(), "write applied");
            for (i, record) in outcome.emissions.iter().enumerate() {
                let label = if i == 0 { "replay" } else { "emitted" };
                println!("{}: {}", label, Value::Object(record.clone()));
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&Value::Object(outcome.snapshot))?
            );
        }
    }

    Ok(())
}

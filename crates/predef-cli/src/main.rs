use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use predef::{check_bundle_file, load_config, resolve_snapshot_file};

#[derive(Parser)]
#[command(name = "predef")]
#[command(about = "Flatten a host type graph into a deduplicated type bundle")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output with targets
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a host snapshot into a bundle
    Resolve {
        /// Snapshot file (.json, .yaml or .yml)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Output file. Prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a bundle and print statistics
    Check {
        /// Bundle JSON file
        #[arg(short, long)]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        Level::TRACE
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // stdout carries the bundle, so logs go to stderr
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            snapshot,
            output,
            config,
            pretty,
        } => {
            let config = load_config(config.as_deref())?;
            let json = resolve_snapshot_file(&snapshot, output.as_deref(), &config, pretty)?;
            if output.is_none() {
                println!("{}", json);
            }
        }
        Commands::Check { input, json } => {
            let report = check_bundle_file(&input)?;
            if json {
                let rendered =
                    serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
                println!("{}", rendered);
            } else {
                print!("{}", report.summary());
            }
        }
    }

    Ok(())
}

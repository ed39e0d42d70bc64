//! humboldt CLI - Incremental Bybit market history synchronizer.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod dataset;

use dataset::Dataset;

#[derive(Parser)]
#[command(name = "humboldt")]
#[command(about = "Incremental Bybit market history synchronizer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the canonical dataset tables
    #[arg(short, long, default_value = "data", global = true)]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Bring a dataset table up to date
    Fetch {
        /// Dataset to synchronize
        dataset: Dataset,

        /// Trading pair
        #[arg(short, long, default_value = "BTCUSDT")]
        symbol: String,

        /// Contract category (linear, inverse)
        #[arg(short, long, default_value = "linear")]
        category: String,

        /// Sampling interval (5m, 15m, 30m, 1h, 4h, 1d)
        #[arg(short, long, default_value = "1d")]
        interval: String,

        /// Start bound (DDMMYYYY:HHMM) for an empty table. Defaults to
        /// probing upstream for the earliest available history.
        #[arg(long)]
        start: Option<String>,

        /// Binary-search the earliest history instead of scanning
        #[arg(long)]
        binary_probe: bool,
    },

    /// Export a time slice of a dataset to a derived file
    Get {
        /// Dataset to export
        dataset: Dataset,

        /// Start bound (DDMMYYYY:HHMM), inclusive
        start: String,

        /// End bound (DDMMYYYY:HHMM), inclusive
        end: String,

        /// Trading pair
        #[arg(short, long, default_value = "BTCUSDT")]
        symbol: String,

        /// Output directory. Defaults to the current directory.
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Resample to a 4-hour grid by forward fill (fear-greed only)
        #[arg(long)]
        four_hour: bool,
    },

    /// Merge open interest and funding rate into one futures table
    Merge {
        /// Start bound (DDMMYYYY:HHMM), inclusive
        start: String,

        /// End bound (DDMMYYYY:HHMM), inclusive
        end: String,

        /// Trading pair
        #[arg(short, long, default_value = "BTCUSDT")]
        symbol: String,

        /// Output directory. Defaults to the current directory.
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Fetch {
            dataset,
            symbol,
            category,
            interval,
            start,
            binary_probe,
        } => {
            commands::fetch::fetch(
                dataset,
                &symbol,
                &category,
                &interval,
                start.as_deref(),
                &cli.data_dir,
                binary_probe,
            )
            .await
        }
        Commands::Get {
            dataset,
            start,
            end,
            symbol,
            out_dir,
            four_hour,
        } => commands::get::get(dataset, &start, &end, &symbol, &cli.data_dir, &out_dir, four_hour),
        Commands::Merge {
            start,
            end,
            symbol,
            out_dir,
        } => commands::merge::merge(&start, &end, &symbol, &cli.data_dir, &out_dir),
    }
}

//! equipment-analytics CLI binary

use clap::{Parser, Subcommand};
use equipment_analytics_sdk::cli::commands::{handle_ingest, handle_list, handle_report};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "equipment-analytics",
    about = "Ingest equipment CSV datasets and generate PDF reports",
    version
)]
struct Cli {
    /// Directory holding stored datasets and records
    #[arg(long, default_value = ".equipment-analytics", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest a CSV file (use "-" for stdin)
    Ingest {
        /// Path to the CSV file
        input: String,
    },
    /// Generate the PDF report for a stored dataset
    Report {
        /// Dataset id
        id: u64,
        /// Output path (defaults to report_<id>.pdf)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List stored datasets, most recent first
    List,
}

// Storage traits are `?Send`, so the binary runs single-threaded.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Ingest { input } => handle_ingest(&cli.data_dir, &input).await?,
        Command::Report { id, out } => handle_report(&cli.data_dir, id, out.as_deref()).await?,
        Command::List => handle_list(&cli.data_dir).await?,
    }
    Ok(())
}

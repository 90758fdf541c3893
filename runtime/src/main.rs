//! walletscout command-line entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use walletscout::cli::{doctor, locators_cmd, output, run_cmd};

#[derive(Parser)]
#[command(name = "walletscout", version, about = "Scout profitable Solana traders")]
struct Cli {
    /// Suppress progress output.
    #[arg(long, global = true)]
    quiet: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape token addresses and write wallet reports.
    Run(run_cmd::RunArgs),
    /// Check Chromium, the locator table, and the output directory.
    Doctor {
        /// Locator table to validate instead of the built-in one.
        #[arg(long)]
        locators: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the built-in locator table as JSON.
    Locators,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("walletscout=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.quiet {
        std::env::set_var(output::QUIET_ENV, "1");
    }
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Run(args) => run_cmd::run(args).await,
        Command::Doctor { locators, out_dir } => doctor::run(locators.as_deref(), &out_dir).await,
        Command::Locators => locators_cmd::run(),
    }
}

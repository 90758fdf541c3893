//! `walletscout run`: scrape every address and write reports.

use crate::cli::output::{self, Styled};
use crate::config::{load_addresses, RunConfig};
use crate::error::ScrapeError;
use crate::extraction::locators::Locators;
use crate::orchestrator::batch::Orchestrator;
use crate::orchestrator::scraper::BrowserScraper;
use crate::pacing::Pacing;
use crate::renderer::chromium::ChromiumRenderer;
use crate::shutdown;
use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Arguments of the `run` subcommand.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Token addresses to scrape.
    pub addresses: Vec<String>,

    /// File with one token address per line (`#` comments allowed).
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Directory for `{address}_wallets.txt` reports.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Scrape attempts per address.
    #[arg(long, default_value_t = 6)]
    pub max_attempts: u32,

    /// Skip trader rows whose bought price is above this.
    #[arg(long, default_value_t = 3000.0)]
    pub max_price: f64,

    /// Accept wallets whose 30-day PnL (%) is above this.
    #[arg(long, default_value_t = 100.0)]
    pub min_pnl: f64,

    /// Give up on a single page load after this many seconds.
    #[arg(long, default_value_t = 60)]
    pub nav_timeout_secs: u64,

    /// JSON locator table overriding the built-in one.
    #[arg(long)]
    pub locators: Option<PathBuf>,

    /// Chromium executable (default: discovered).
    #[arg(long)]
    pub chromium: Option<PathBuf>,

    /// Show the browser window.
    #[arg(long)]
    pub headful: bool,

    /// Skip settle delays after navigation and clicks.
    #[arg(long)]
    pub no_delay: bool,
}

impl RunArgs {
    /// Resolve arguments into a run configuration.
    pub fn into_config(self) -> Result<RunConfig> {
        let mut config = RunConfig::default();

        let mut addresses = self.addresses;
        if let Some(path) = &self.file {
            addresses.extend(load_addresses(path)?);
        }
        if addresses.is_empty() {
            bail!("no addresses given; pass them as arguments or with --file");
        }
        config.addresses = addresses;

        if let Some(path) = &self.locators {
            config.scrape.locators = Locators::from_file(path)?;
        }
        if self.no_delay {
            config.scrape.pacing = Pacing::none();
        }
        config.scrape.retry.max_attempts = self.max_attempts;
        config.scrape.timeouts.navigation_ms = self.nav_timeout_secs.saturating_mul(1000);
        config.scrape.policy.max_price = self.max_price;
        config.scrape.policy.min_pnl = self.min_pnl;
        config.out_dir = self.out_dir;
        config.chromium = self.chromium;
        config.headless = !self.headful;
        config.show_progress = !output::is_quiet();
        Ok(config)
    }
}

/// Run the batch until done or interrupted.
pub async fn run(args: RunArgs) -> Result<()> {
    let s = Styled::new();
    let config = args.into_config()?;
    info!(
        "scraping {} address(es) into {}",
        config.addresses.len(),
        config.out_dir.display()
    );

    let renderer = Arc::new(ChromiumRenderer::new(config.chromium.clone(), config.headless));
    let scraper = BrowserScraper::new(renderer, Arc::new(config.scrape.clone()));
    let orchestrator = Orchestrator::new(scraper, &config);

    let (trigger, shutdown) = shutdown::channel();
    shutdown::trigger_on_ctrl_c(trigger);

    match orchestrator.run_all(&shutdown).await {
        Ok(summary) => {
            if !output::is_quiet() {
                eprintln!(
                    "  {} {} report(s) written",
                    s.ok_sym(),
                    summary.written.len()
                );
                for (address, reason) in &summary.failed {
                    eprintln!("  {} {address}: {reason}", s.fail_sym());
                }
            }
            Ok(())
        }
        Err(ScrapeError::Interrupted) => {
            eprintln!("Bot is off");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: RunArgs,
    }

    #[test]
    fn test_args_into_config() {
        let mut list = tempfile::NamedTempFile::new().unwrap();
        writeln!(list, "# tokens\nFROMFILE\n").unwrap();

        let harness = Harness::parse_from([
            "walletscout",
            "ARG1",
            "--file",
            list.path().to_str().unwrap(),
            "--max-attempts",
            "3",
            "--min-pnl",
            "250",
            "--no-delay",
            "--headful",
            "--nav-timeout-secs",
            "90",
        ]);
        let config = harness.args.into_config().unwrap();
        assert_eq!(config.addresses, vec!["ARG1", "FROMFILE"]);
        assert_eq!(config.scrape.retry.max_attempts, 3);
        assert_eq!(config.scrape.policy.min_pnl, 250.0);
        assert_eq!(config.scrape.policy.max_price, 3000.0);
        assert_eq!(config.scrape.pacing, Pacing::none());
        assert_eq!(config.scrape.timeouts.navigation_ms, 90_000);
        assert!(!config.headless);
    }

    #[test]
    fn test_no_addresses_is_an_error() {
        let harness = Harness::parse_from(["walletscout"]);
        assert!(harness.args.into_config().is_err());
    }
}

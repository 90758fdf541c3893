//! Run configuration: dashboards, thresholds, pacing, retry, and inputs.

use crate::extraction::locators::Locators;
use crate::orchestrator::retry::RetryPolicy;
use crate::pacing::Pacing;
use crate::sieve::policy::AcceptancePolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base URLs of the two dashboards. Addresses are appended verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    pub token_base: String,
    pub wallet_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            token_base: "https://dexscreener.com/solana/".to_string(),
            wallet_base: "https://gmgn.ai/sol/address/".to_string(),
        }
    }
}

impl Endpoints {
    pub fn token_url(&self, address: &str) -> String {
        format!("{}{address}", self.token_base)
    }

    pub fn wallet_url(&self, wallet: &str) -> String {
        format!("{}{wallet}", self.wallet_base)
    }
}

/// Upper bound on a single page load, in milliseconds.
///
/// This only catches a hung browser. How long a page is given to settle
/// after loading lives in [`Pacing`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeouts {
    pub navigation_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 60_000,
        }
    }
}

/// Everything one scrape cycle needs besides the browser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub endpoints: Endpoints,
    pub locators: Locators,
    pub pacing: Pacing,
    pub timeouts: Timeouts,
    pub policy: AcceptancePolicy,
    pub retry: RetryPolicy,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            locators: Locators::embedded().clone(),
            pacing: Pacing::default(),
            timeouts: Timeouts::default(),
            policy: AcceptancePolicy::default(),
            retry: RetryPolicy::default(),
        }
    }
}

/// A whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Token addresses, processed in order.
    pub addresses: Vec<String>,
    /// Directory receiving `{address}_wallets.txt` reports.
    pub out_dir: PathBuf,
    pub scrape: ScrapeConfig,
    /// Run Chromium without a window.
    pub headless: bool,
    /// Explicit Chromium executable; discovered when absent.
    pub chromium: Option<PathBuf>,
    /// Draw progress spinners.
    pub show_progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            out_dir: PathBuf::from("."),
            scrape: ScrapeConfig::default(),
            headless: true,
            chromium: None,
            show_progress: true,
        }
    }
}

/// Parse an address list: one per line, `#` starts a comment.
pub fn parse_addresses(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Read an address list file.
pub fn load_addresses(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading address list {}", path.display()))?;
    Ok(parse_addresses(&raw))
}

//! Locator table for the token and wallet dashboards.
//!
//! Both dashboards are third-party pages with no stable hooks, so every field
//! is found by a positional CSS path. The paths live in data, not code: when a
//! layout shifts, edit `locators.json` (or pass an override file) and leave the
//! extraction logic alone.

use anyhow::{bail, Context, Result};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Default table, embedded at compile time.
const LOCATORS_JSON: &str = include_str!("locators.json");

/// How a single top-traders row is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderRowLayout {
    /// Zero-based index of the column holding the bought-price cell.
    pub price_column: usize,
    /// Selector for the price text inside that column.
    pub price: String,
    /// Selector for the wallet link inside the row's last column.
    pub wallet_link: String,
}

/// Every locator the extractor uses, by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locators {
    /// Title of the anti-bot interstitial page.
    pub challenge_title: String,
    pub token_symbol: String,
    pub top_traders_tab: String,
    /// Container whose element children are the trader rows.
    pub traders_table: String,
    pub trader_row: TraderRowLayout,
    /// Close buttons of modals the wallet page may pop up, in click order.
    pub wallet_modals: Vec<String>,
    pub period_30d: String,
    pub wallet_pnl: String,
    pub wallet_win_rate: String,
}

impl Locators {
    /// The built-in table.
    pub fn embedded() -> &'static Locators {
        static TABLE: OnceLock<Locators> = OnceLock::new();
        TABLE.get_or_init(|| {
            serde_json::from_str(LOCATORS_JSON).expect("embedded locators.json is malformed")
        })
    }

    /// Load and validate a table from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading locator table {}", path.display()))?;
        let table: Locators = serde_json::from_str(&raw)
            .with_context(|| format!("parsing locator table {}", path.display()))?;
        table.validate()?;
        Ok(table)
    }

    /// Check that every selector parses.
    pub fn validate(&self) -> Result<()> {
        let mut named: Vec<(&str, &str)> = vec![
            ("token_symbol", self.token_symbol.as_str()),
            ("top_traders_tab", self.top_traders_tab.as_str()),
            ("traders_table", self.traders_table.as_str()),
            ("trader_row.price", self.trader_row.price.as_str()),
            ("trader_row.wallet_link", self.trader_row.wallet_link.as_str()),
            ("period_30d", self.period_30d.as_str()),
            ("wallet_pnl", self.wallet_pnl.as_str()),
            ("wallet_win_rate", self.wallet_win_rate.as_str()),
        ];
        for modal in &self.wallet_modals {
            named.push(("wallet_modals", modal.as_str()));
        }

        for (name, css) in named {
            if let Err(e) = Selector::parse(css) {
                bail!("locator {name} is not a valid selector ({css}): {e:?}");
            }
        }
        if self.challenge_title.trim().is_empty() {
            bail!("locator challenge_title must not be empty");
        }
        Ok(())
    }

    /// Pretty JSON rendering, suitable as a starting point for an override file.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse a CSS selector, mapping failure into the scrape error space.
pub(crate) fn compile(css: &str) -> crate::error::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("invalid selector {css}: {e:?}").into())
}

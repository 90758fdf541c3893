//! Parsing of wallet-page statistics.

use super::locators::{compile, Locators};
use crate::error::Result;
use crate::types::WinRate;
use anyhow::anyhow;
use scraper::Html;

/// Win-rate text the wallet page shows when it has no trades to rate.
pub const UNKNOWN_WIN_RATE: &str = "--%";

/// Parse a PnL reading such as `+152.3%` into a percentage.
pub fn parse_pnl(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    trimmed
        .trim_end_matches('%')
        .parse::<f64>()
        .map_err(|_| anyhow!("unparsable pnl {trimmed:?}").into())
}

/// Parse a win-rate reading. `--%` is unknown, never zero.
pub fn parse_win_rate(text: &str) -> Result<WinRate> {
    let trimmed = text.trim();
    if trimmed == UNKNOWN_WIN_RATE {
        return Ok(WinRate::Unknown);
    }
    trimmed
        .trim_end_matches('%')
        .parse::<f64>()
        .map(WinRate::Known)
        .map_err(|_| anyhow!("unparsable win rate {trimmed:?}").into())
}

/// Modal close buttons present in the document, in table order.
pub fn present_modals<'a>(html: &str, locators: &'a Locators) -> Vec<&'a str> {
    let document = Html::parse_document(html);
    locators
        .wallet_modals
        .iter()
        .filter(|css| {
            compile(css)
                .map(|sel| document.select(&sel).next().is_some())
                .unwrap_or(false)
        })
        .map(String::as_str)
        .collect()
}

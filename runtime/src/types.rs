//! Data model shared by the extractor, the wallet sieve, and reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbol reported when the token page does not expose one.
pub const UNKNOWN_SYMBOL: &str = "--";

/// Token metadata read from the token dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Ticker, always `$`-prefixed unless it is [`UNKNOWN_SYMBOL`].
    pub symbol: String,
}

impl TokenInfo {
    /// Normalize a raw symbol: blank becomes the sentinel, others gain a `$`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let symbol = match raw.map(str::trim) {
            None | Some("") => UNKNOWN_SYMBOL.to_string(),
            Some(s) if s.starts_with('$') => s.to_string(),
            Some(s) => format!("${s}"),
        };
        Self { symbol }
    }
}

/// A row of the top-traders table that survived the price filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletCandidate {
    pub price: f64,
    pub address: String,
}

/// Win rate as shown on the wallet page; `--%` is reported as unknown.
///
/// Known values display with a decimal point (`100.0`), the way the
/// reports have always printed them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinRate {
    Known(f64),
    Unknown,
}

impl fmt::Display for WinRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{v:?}"),
            Self::Unknown => f.write_str("--"),
        }
    }
}

/// 30-day statistics read from a wallet page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalletStats {
    /// Profit and loss, in percent.
    pub pnl: f64,
    pub win_rate: WinRate,
}

/// A wallet that passed the acceptance policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingWallet {
    pub address: String,
    pub pnl: f64,
    pub win_rate: WinRate,
}

impl QualifyingWallet {
    pub fn new(candidate: WalletCandidate, stats: WalletStats) -> Self {
        Self {
            address: candidate.address,
            pnl: stats.pnl,
            win_rate: stats.win_rate,
        }
    }
}

/// Outcome of scraping one token address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub token_symbol: String,
    /// Accepted wallets in trader-table order.
    pub wallets: Vec<QualifyingWallet>,
}

impl ScrapeResult {
    /// Fallback written when every attempt for an address failed.
    pub fn empty() -> Self {
        Self {
            token_symbol: UNKNOWN_SYMBOL.to_string(),
            wallets: Vec::new(),
        }
    }
}

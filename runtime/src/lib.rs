//! walletscout: find profitable Solana traders from public dashboards.
//!
//! For each token address the scraper opens the token dashboard in a real
//! browser, switches to its top-traders view, visits every trader's wallet
//! page, and keeps wallets whose 30-day PnL or win rate clears the
//! [`sieve::policy::AcceptancePolicy`]. The [`orchestrator`] retries each
//! address a bounded number of times and writes one report per address.

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod orchestrator;
pub mod pacing;
pub mod renderer;
pub mod shutdown;
pub mod sieve;
pub mod types;

pub use error::{Result, ScrapeError};
pub use types::{QualifyingWallet, ScrapeResult, TokenInfo, WalletCandidate, WalletStats, WinRate};

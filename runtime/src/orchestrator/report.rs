//! Per-address report text and its file on disk.

use crate::config::Endpoints;
use crate::types::ScrapeResult;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Markdown-flavoured report for one token address.
pub fn format_report(address: &str, result: &ScrapeResult, endpoints: &Endpoints) -> String {
    let mut reply = format!(
        "_Token:_ [{}]({})\n\n",
        result.token_symbol,
        endpoints.token_url(address)
    );

    if result.wallets.is_empty() {
        reply.push_str("_No valid wallets_\n");
        return reply;
    }

    reply.push_str("_Valid wallets:_\n");
    for wallet in &result.wallets {
        let _ = writeln!(
            reply,
            "[{}]({}), PnL:{:?}%, winrate:{}%",
            wallet.address,
            endpoints.wallet_url(&wallet.address),
            wallet.pnl,
            wallet.win_rate
        );
    }
    reply
}

/// Where the report for `address` lands.
pub fn report_path(out_dir: &Path, address: &str) -> PathBuf {
    out_dir.join(format!("{address}_wallets.txt"))
}

/// Write (or overwrite) the report for `address`.
pub fn write_report(out_dir: &Path, address: &str, content: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let path = report_path(out_dir, address);
    std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

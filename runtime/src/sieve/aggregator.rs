//! One scrape cycle for a token address.

use super::policy::AcceptancePolicy;
use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::extraction::extractor::PageExtractor;
use crate::renderer::RenderContext;
use crate::types::{QualifyingWallet, ScrapeResult, WalletCandidate, WalletStats};
use tracing::{debug, info};

/// Keep a candidate when its stats pass the policy.
pub fn qualify(
    policy: &AcceptancePolicy,
    candidate: WalletCandidate,
    stats: WalletStats,
) -> Option<QualifyingWallet> {
    policy
        .accepts(&stats)
        .then(|| QualifyingWallet::new(candidate, stats))
}

/// Open the token page, visit every candidate wallet, and keep the qualifiers.
///
/// A failure on any wallet aborts the whole cycle; the caller retries from the
/// token page.
pub async fn scrape_token(
    context: &mut dyn RenderContext,
    config: &ScrapeConfig,
    address: &str,
) -> Result<ScrapeResult> {
    let mut extractor = PageExtractor::new(context, config);

    let token = extractor.open_token_page(address).await?;
    info!("token {} ({address})", token.symbol);

    extractor.select_top_traders().await?;
    let candidates = extractor.list_wallet_candidates(address).await?;
    info!("{} candidate wallet(s)", candidates.len());

    let mut wallets = Vec::new();
    for candidate in candidates {
        let stats = extractor.open_wallet_page(&candidate.address).await?;
        debug!(
            "wallet {}: pnl {}%, winrate {}%",
            candidate.address, stats.pnl, stats.win_rate
        );
        if let Some(wallet) = qualify(&config.policy, candidate, stats) {
            wallets.push(wallet);
        }
    }

    Ok(ScrapeResult {
        token_symbol: token.symbol,
        wallets,
    })
}

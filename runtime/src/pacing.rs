//! Settle delays after navigation and clicks.
//!
//! Both dashboards render client-side; reading the DOM straight after a
//! navigation or tab switch sees half-built tables.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pauses applied by the extractor, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pacing {
    /// Window the token page gets to settle before anything is read.
    pub token_settle_ms: u64,
    /// Same for a wallet page; GMGN takes far longer to hydrate.
    pub wallet_settle_ms: u64,
    pub after_token_nav_ms: u64,
    pub after_challenge_ms: u64,
    pub after_tab_click_ms: u64,
    pub after_wallet_nav_ms: u64,
    pub after_period_click_ms: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            token_settle_ms: 6000,
            wallet_settle_ms: 20000,
            after_token_nav_ms: 5000,
            after_challenge_ms: 2000,
            after_tab_click_ms: 2000,
            after_wallet_nav_ms: 1000,
            after_period_click_ms: 1000,
        }
    }
}

impl Pacing {
    /// No pauses at all.
    pub fn none() -> Self {
        Self {
            token_settle_ms: 0,
            wallet_settle_ms: 0,
            after_token_nav_ms: 0,
            after_challenge_ms: 0,
            after_tab_click_ms: 0,
            after_wallet_nav_ms: 0,
            after_period_click_ms: 0,
        }
    }
}

/// Sleep for `ms` milliseconds; zero returns immediately.
pub async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pause_waits() {
        let start = std::time::Instant::now();
        pause(20).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_default_matches_dashboard_timings() {
        let pacing = Pacing::default();
        assert_eq!(pacing.token_settle_ms, 6000);
        assert_eq!(pacing.wallet_settle_ms, 20000);
        assert_eq!(pacing.after_token_nav_ms, 5000);
        assert_eq!(pacing.after_wallet_nav_ms, 1000);
    }

    #[tokio::test]
    async fn test_zero_pause_is_immediate() {
        let start = std::time::Instant::now();
        pause(Pacing::none().after_challenge_ms).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}

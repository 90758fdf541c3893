//! Acceptance thresholds for trader wallets.

use crate::types::{WalletStats, WinRate};
use serde::{Deserialize, Serialize};

/// Numeric acceptance rules.
///
/// A wallet qualifies when its PnL is strictly above `min_pnl`, or when its
/// recorded win rate is exactly `perfect_win_rate`. The two rules are OR-ed,
/// so a wallet with modest PnL and a perfect win rate still qualifies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptancePolicy {
    /// Trader rows with a bought price above this are never visited.
    pub max_price: f64,
    pub min_pnl: f64,
    pub perfect_win_rate: f64,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self {
            max_price: 3000.0,
            min_pnl: 100.0,
            perfect_win_rate: 100.0,
        }
    }
}

impl AcceptancePolicy {
    pub fn accepts(&self, stats: &WalletStats) -> bool {
        // TODO: confirm with product whether a perfect win rate alone should
        // qualify a wallet whose PnL is below min_pnl.
        stats.pnl > self.min_pnl
            || matches!(stats.win_rate, WinRate::Known(w) if w == self.perfect_win_rate)
    }
}

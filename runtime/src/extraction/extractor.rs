//! Page Extractor: navigates the dashboards and returns typed readings.

use super::{token_page, wallet_page};
use crate::config::ScrapeConfig;
use crate::error::{Result, ScrapeError};
use crate::pacing::pause;
use crate::renderer::RenderContext;
use crate::types::{TokenInfo, WalletCandidate, WalletStats};
use tracing::{debug, info};

/// Drives one browser session across the token page and its wallet pages.
pub struct PageExtractor<'a> {
    context: &'a mut dyn RenderContext,
    config: &'a ScrapeConfig,
}

impl<'a> PageExtractor<'a> {
    pub fn new(context: &'a mut dyn RenderContext, config: &'a ScrapeConfig) -> Self {
        Self { context, config }
    }

    /// Open the token dashboard and read its symbol.
    ///
    /// Fails with [`ScrapeError::NotReady`] while the anti-bot interstitial is
    /// showing.
    pub async fn open_token_page(&mut self, address: &str) -> Result<TokenInfo> {
        let url = self.config.endpoints.token_url(address);
        let nav = self
            .context
            .navigate(&url, self.config.timeouts.navigation_ms)
            .await?;
        pause(self.config.pacing.token_settle_ms).await;
        pause(self.config.pacing.after_token_nav_ms).await;
        debug!("opened {} in {}ms", nav.final_url, nav.load_time_ms);

        let title = self.context.title().await?;
        if title.trim() == self.config.locators.challenge_title {
            return Err(ScrapeError::NotReady { url });
        }
        info!("passed anti-bot check");
        pause(self.config.pacing.after_challenge_ms).await;

        let html = self.context.page_source().await?;
        token_page::parse_token_symbol(&html, &self.config.locators)
    }

    /// Switch the token page to its top-traders view.
    pub async fn select_top_traders(&mut self) -> Result<()> {
        self.context
            .click(&self.config.locators.top_traders_tab)
            .await?;
        pause(self.config.pacing.after_tab_click_ms).await;
        Ok(())
    }

    /// Read the top-traders table. Call [`Self::select_top_traders`] first.
    pub async fn list_wallet_candidates(&self, address: &str) -> Result<Vec<WalletCandidate>> {
        let html = self.context.page_source().await?;
        token_page::parse_wallet_candidates(
            &html,
            &self.config.locators,
            address,
            self.config.policy.max_price,
        )
    }

    /// Open a wallet page and read its 30-day statistics.
    pub async fn open_wallet_page(&mut self, wallet: &str) -> Result<WalletStats> {
        let url = self.config.endpoints.wallet_url(wallet);
        self.context
            .navigate(&url, self.config.timeouts.navigation_ms)
            .await?;
        pause(self.config.pacing.wallet_settle_ms).await;
        pause(self.config.pacing.after_wallet_nav_ms).await;

        self.dismiss_modals().await;

        let locators = &self.config.locators;
        self.context.click(&locators.period_30d).await?;
        pause(self.config.pacing.after_period_click_ms).await;

        let pnl = self.context.element_text(&locators.wallet_pnl).await?;
        let win_rate = self.context.element_text(&locators.wallet_win_rate).await?;

        Ok(WalletStats {
            pnl: wallet_page::parse_pnl(&pnl)?,
            win_rate: wallet_page::parse_win_rate(&win_rate)?,
        })
    }

    /// Close whichever known modals are showing. Never fails.
    async fn dismiss_modals(&mut self) {
        let locators = &self.config.locators;
        for modal in &locators.wallet_modals {
            let present = match self.context.page_source().await {
                Ok(html) => wallet_page::present_modals(&html, locators).contains(&modal.as_str()),
                Err(_) => false,
            };
            if !present {
                continue;
            }
            if let Err(e) = self.context.click(modal).await {
                debug!("modal {modal} could not be dismissed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::fixture::FixtureSite;
    use crate::renderer::Renderer;
    use crate::types::WinRate;

    fn config() -> ScrapeConfig {
        let mut config = ScrapeConfig {
            pacing: crate::pacing::Pacing::none(),
            ..ScrapeConfig::default()
        };
        config.locators.token_symbol = "h2.symbol".into();
        config.locators.top_traders_tab = "button#top-traders".into();
        config.locators.traders_table = "div#traders".into();
        config.locators.period_30d = "div#period-30d".into();
        config.locators.wallet_pnl = "div#pnl".into();
        config.locators.wallet_win_rate = "div#winrate".into();
        config
    }

    fn wallet_html(pnl: &str, win_rate: &str) -> String {
        format!(
            r#"<html><body><div id="period-30d">30d</div><div id="pnl">{pnl}</div><div id="winrate">{win_rate}</div></body></html>"#
        )
    }

    #[tokio::test]
    async fn test_token_page_behind_challenge_is_not_ready() {
        let config = config();
        let url = config.endpoints.token_url("TOKEN");
        let site = FixtureSite::new().page(&url, "Just a moment...", "<html></html>");

        let mut context = site.new_context().await.unwrap();
        let mut extractor = PageExtractor::new(context.as_mut(), &config);
        let err = extractor.open_token_page("TOKEN").await.unwrap_err();
        assert!(matches!(err, ScrapeError::NotReady { .. }));
    }

    #[tokio::test]
    async fn test_token_page_symbol() {
        let config = config();
        let url = config.endpoints.token_url("TOKEN");
        let site = FixtureSite::new().page(
            &url,
            "BONK | DEX Screener",
            r#"<html><body><h2 class="symbol">BONK</h2></body></html>"#,
        );

        let mut context = site.new_context().await.unwrap();
        let mut extractor = PageExtractor::new(context.as_mut(), &config);
        assert_eq!(extractor.open_token_page("TOKEN").await.unwrap().symbol, "$BONK");
    }

    #[tokio::test]
    async fn test_top_traders_click_then_list() {
        let config = config();
        let url = config.endpoints.token_url("TOKEN");
        let before = r#"<html><body><h2 class="symbol">BONK</h2><button id="top-traders">Top Traders</button></body></html>"#;
        let after = r#"<html><body><div id="traders">
            <div><div>1</div><div>x</div><div><span>$120</span></div><div><a href="/solana/account/W1">w</a></div></div>
            <div><div>2</div><div>x</div><div><span>45K</span></div><div><a href="/solana/account/W2">w</a></div></div>
        </div></body></html>"#;
        let site = FixtureSite::new()
            .page(&url, "BONK", before)
            .on_click(&url, "button#top-traders", after);

        let mut context = site.new_context().await.unwrap();
        let mut extractor = PageExtractor::new(context.as_mut(), &config);
        extractor.open_token_page("TOKEN").await.unwrap();
        extractor.select_top_traders().await.unwrap();
        let candidates = extractor.list_wallet_candidates("TOKEN").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].address, "W1");
    }

    #[tokio::test]
    async fn test_wallet_page_stats_and_unknown_win_rate() {
        let config = config();
        let site = FixtureSite::new()
            .page(&config.endpoints.wallet_url("W1"), "W1", &wallet_html("+250.5%", "--%"));

        let mut context = site.new_context().await.unwrap();
        let mut extractor = PageExtractor::new(context.as_mut(), &config);
        let stats = extractor.open_wallet_page("W1").await.unwrap();
        assert_eq!(stats.pnl, 250.5);
        assert_eq!(stats.win_rate, WinRate::Unknown);
    }

    #[tokio::test]
    async fn test_wallet_page_dismisses_modal() {
        let config = config();
        let url = config.endpoints.wallet_url("W1");
        let with_modal = r#"<html><body><div id="chakra-modal-:ri:"><button>x</button></div></body></html>"#;
        let site = FixtureSite::new().page(&url, "W1", with_modal).on_click(
            &url,
            &config.locators.wallet_modals[1],
            &wallet_html("12%", "100%"),
        );

        let mut context = site.new_context().await.unwrap();
        let mut extractor = PageExtractor::new(context.as_mut(), &config);
        let stats = extractor.open_wallet_page("W1").await.unwrap();
        assert_eq!(stats.win_rate, WinRate::Known(100.0));
        assert_eq!(site.clicks(), vec![config.locators.wallet_modals[1].clone(), "div#period-30d".to_string()]);
    }

    #[tokio::test]
    async fn test_navigation_uses_load_cap_not_settle_window() {
        let mut config = config();
        config.timeouts.navigation_ms = 45_000;
        let token_url = config.endpoints.token_url("TOKEN");
        let site = FixtureSite::new()
            .page(&token_url, "BONK", r#"<h2 class="symbol">BONK</h2>"#)
            .page(&config.endpoints.wallet_url("W1"), "W1", &wallet_html("5%", "50%"));

        let mut context = site.new_context().await.unwrap();
        let mut extractor = PageExtractor::new(context.as_mut(), &config);
        extractor.open_token_page("TOKEN").await.unwrap();
        extractor.open_wallet_page("W1").await.unwrap();
        assert_eq!(site.navigation_timeouts(), vec![45_000, 45_000]);
    }

    #[tokio::test]
    async fn test_wallet_page_missing_stats_is_structure_missing() {
        let config = config();
        let url = config.endpoints.wallet_url("W1");
        let site = FixtureSite::new().page(
            &url,
            "W1",
            r#"<html><body><div id="period-30d">30d</div></body></html>"#,
        );

        let mut context = site.new_context().await.unwrap();
        let mut extractor = PageExtractor::new(context.as_mut(), &config);
        let err = extractor.open_wallet_page("W1").await.unwrap_err();
        assert!(matches!(err, ScrapeError::StructureMissing { .. }));
    }
}

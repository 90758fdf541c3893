//! Browser-backed scraping of one address, with retry and fallback.

use super::retry::{run_attempts, Attempt, RetryOutcome};
use crate::config::ScrapeConfig;
use crate::error::Result;
use crate::renderer::{RenderContext, Renderer};
use crate::shutdown::Shutdown;
use crate::sieve::aggregator::scrape_token;
use crate::types::ScrapeResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Produces a [`ScrapeResult`] for a token address.
///
/// Implementations absorb ordinary scrape failures themselves; an `Err` here
/// means the address could not be processed at all, or the run was
/// interrupted.
#[async_trait]
pub trait AddressScraper: Send + Sync {
    async fn scrape(&self, address: &str, shutdown: &Shutdown) -> Result<ScrapeResult>;
}

/// One full token-page cycle against a live session.
struct TokenCycle<'a> {
    context: &'a mut dyn RenderContext,
    config: &'a ScrapeConfig,
    address: &'a str,
}

#[async_trait]
impl<'a> Attempt for TokenCycle<'a> {
    type Output = ScrapeResult;

    async fn run(&mut self, _attempt: u32) -> Result<ScrapeResult> {
        scrape_token(&mut *self.context, self.config, self.address).await
    }
}

/// Runs the retry loop inside a single browser session per address.
pub struct BrowserScraper {
    renderer: Arc<dyn Renderer>,
    config: Arc<ScrapeConfig>,
}

impl BrowserScraper {
    pub fn new(renderer: Arc<dyn Renderer>, config: Arc<ScrapeConfig>) -> Self {
        Self { renderer, config }
    }
}

#[async_trait]
impl AddressScraper for BrowserScraper {
    async fn scrape(&self, address: &str, shutdown: &Shutdown) -> Result<ScrapeResult> {
        info!("opening browser session for {address}");
        let mut context = self.renderer.new_context().await?;

        let outcome = {
            let mut cycle = TokenCycle {
                context: context.as_mut(),
                config: &self.config,
                address,
            };
            run_attempts(&self.config.retry, shutdown, &mut cycle).await
        };

        if let Err(e) = context.close().await {
            warn!("closing browser session failed: {e}");
        }
        info!("browser session closed");

        match outcome? {
            RetryOutcome::Success { value, attempts } => {
                info!(
                    "{address}: {} qualifying wallet(s) after {attempts} attempt(s)",
                    value.wallets.len()
                );
                Ok(value)
            }
            RetryOutcome::ExhaustedFailure { error, attempts } => {
                warn!("{address}: giving up after {attempts} attempt(s): {error}");
                Ok(ScrapeResult::empty())
            }
        }
    }
}

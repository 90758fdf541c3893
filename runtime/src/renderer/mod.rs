//! Browser capability consumed by the extractor.
//!
//! The scraper only needs four things from a browser: navigate, click,
//! read the rendered document, and read an element's text. Anything that can
//! do those (a real Chromium, or a fixture-backed fake in tests) plugs in here.

pub mod chromium;
pub mod fixture;

use crate::error::Result;
use async_trait::async_trait;

/// Outcome of a navigation.
#[derive(Debug, Clone)]
pub struct NavigationResult {
    /// URL the browser ended up on.
    pub final_url: String,
    /// Wall time spent loading, in milliseconds.
    pub load_time_ms: u64,
}

/// One live browser session: a single tab with its own cookies.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Load `url` and wait for it to settle, giving up after `timeout_ms`.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult>;

    /// Document title of the current page.
    async fn title(&self) -> Result<String>;

    /// Serialized rendered DOM of the current page.
    async fn page_source(&self) -> Result<String>;

    /// Click the first element matching a CSS selector.
    ///
    /// Fails with [`crate::error::ScrapeError::StructureMissing`] when nothing
    /// matches.
    async fn click(&mut self, selector: &str) -> Result<()>;

    /// Visible text of the first element matching a CSS selector.
    async fn element_text(&self, selector: &str) -> Result<String>;

    /// Tear the session down.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Factory for browser sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>>;
}

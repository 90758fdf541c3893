//! Renderer backed by canned HTML instead of a browser.
//!
//! Pages are keyed by URL. A click can swap the current page's markup, which
//! is how tab switches and modal dismissals are modelled. Every session shares
//! the same site, so navigation counts carry across sessions.

use super::{NavigationResult, RenderContext, Renderer};
use crate::error::{Result, ScrapeError};
use crate::extraction::locators::compile;
use anyhow::anyhow;
use async_trait::async_trait;
use scraper::Html;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
struct FixturePage {
    title: String,
    html: String,
}

#[derive(Debug, Default)]
struct SiteLog {
    visits: HashMap<String, usize>,
    nav_timeouts: Vec<u64>,
    clicks: Vec<String>,
}

/// A set of canned pages plus a log of what sessions did with them.
#[derive(Debug, Clone, Default)]
pub struct FixtureSite {
    pages: Arc<HashMap<String, FixturePage>>,
    after_click: Arc<HashMap<(String, String), String>>,
    challenged: Arc<HashMap<String, usize>>,
    log: Arc<Mutex<SiteLog>>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl FixtureSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` with `title` at `url`.
    pub fn page(mut self, url: &str, title: &str, html: &str) -> Self {
        Arc::make_mut(&mut self.pages).insert(
            url.to_string(),
            FixturePage {
                title: title.to_string(),
                html: html.to_string(),
            },
        );
        self
    }

    /// After `selector` is clicked on `url`, the page markup becomes `html`.
    pub fn on_click(mut self, url: &str, selector: &str, html: &str) -> Self {
        Arc::make_mut(&mut self.after_click)
            .insert((url.to_string(), selector.to_string()), html.to_string());
        self
    }

    /// The first `times` visits to `url` show the anti-bot interstitial.
    pub fn challenge(mut self, url: &str, times: usize) -> Self {
        Arc::make_mut(&mut self.challenged).insert(url.to_string(), times);
        self
    }

    /// Number of navigations made to `url` so far.
    pub fn visits(&self, url: &str) -> usize {
        self.lock().visits.get(url).copied().unwrap_or(0)
    }

    /// Timeout passed with each navigation, in order.
    pub fn navigation_timeouts(&self) -> Vec<u64> {
        self.lock().nav_timeouts.clone()
    }

    /// Selectors clicked so far, in order.
    pub fn clicks(&self) -> Vec<String> {
        self.lock().clicks.clone()
    }

    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn sessions_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SiteLog> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Renderer for FixtureSite {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureContext {
            site: self.clone(),
            current: None,
        }))
    }
}

/// A session over a [`FixtureSite`].
pub struct FixtureContext {
    site: FixtureSite,
    current: Option<(String, FixturePage)>,
}

impl FixtureContext {
    fn current(&self) -> Result<&(String, FixturePage)> {
        self.current
            .as_ref()
            .ok_or_else(|| anyhow!("no page loaded").into())
    }

    fn matches(&self, selector: &str) -> Result<bool> {
        let (_, page) = self.current()?;
        let sel = compile(selector)?;
        Ok(Html::parse_document(&page.html).select(&sel).next().is_some())
    }
}

#[async_trait]
impl RenderContext for FixtureContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let mut page = self
            .site
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no fixture for {url}"))?;

        let visit = {
            let mut log = self.site.lock();
            log.nav_timeouts.push(timeout_ms);
            let count = log.visits.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        if self.site.challenged.get(url).is_some_and(|&n| visit <= n) {
            page = FixturePage {
                title: "Just a moment...".to_string(),
                html: "<html><body>Checking your browser</body></html>".to_string(),
            };
        }

        self.current = Some((url.to_string(), page));
        Ok(NavigationResult {
            final_url: url.to_string(),
            load_time_ms: 0,
        })
    }

    async fn title(&self) -> Result<String> {
        Ok(self.current()?.1.title.clone())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.current()?.1.html.clone())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        if !self.matches(selector)? {
            return Err(ScrapeError::missing(selector));
        }
        self.site.lock().clicks.push(selector.to_string());

        let url = self.current()?.0.clone();
        if let Some(html) = self
            .site
            .after_click
            .get(&(url, selector.to_string()))
            .cloned()
        {
            if let Some((_, page)) = self.current.as_mut() {
                page.html = html;
            }
        }
        Ok(())
    }

    async fn element_text(&self, selector: &str) -> Result<String> {
        let (_, page) = self.current()?;
        let sel = compile(selector)?;
        let document = Html::parse_document(&page.html);
        let text = document
            .select(&sel)
            .next()
            .map(|el| el.text().collect::<String>())
            .ok_or_else(|| ScrapeError::missing(selector))?;
        Ok(text.trim().to_string())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.site.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

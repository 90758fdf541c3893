//! Chromium-backed renderer using `chromiumoxide` over CDP.

use super::{NavigationResult, RenderContext, Renderer};
use crate::error::{Result, ScrapeError};
use anyhow::{anyhow, Context as _};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Environment variable pointing at a Chromium/Chrome executable.
pub const CHROMIUM_PATH_ENV: &str = "WALLETSCOUT_CHROMIUM_PATH";

/// Executable names tried on `PATH`, most specific first.
const BROWSER_NAMES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
];

/// Locate a browser: the env override, then the per-user install, then `PATH`.
pub fn find_chromium() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CHROMIUM_PATH_ENV).map(PathBuf::from) {
        if path.is_file() {
            return Some(path);
        }
        warn!("{CHROMIUM_PATH_ENV}={} does not exist", path.display());
    }

    dirs::data_local_dir()
        .map(|dir| dir.join("walletscout").join("chromium").join("chrome"))
        .filter(|path| path.is_file())
        .or_else(|| search_path(&std::env::var_os("PATH")?))
}

fn search_path(path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .flat_map(|dir| BROWSER_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
}

/// `--version` output with the vendor prefix stripped.
pub fn chromium_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    let raw = String::from_utf8_lossy(&output.stdout);
    let version = raw
        .trim()
        .trim_start_matches("Google Chrome ")
        .trim_start_matches("Chromium ");
    Some(version.to_string())
}

/// Launches one Chromium process per session.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    executable: Option<PathBuf>,
    headless: bool,
}

impl ChromiumRenderer {
    pub fn new(executable: Option<PathBuf>, headless: bool) -> Self {
        Self {
            executable,
            headless,
        }
    }

    fn browser_config(&self) -> anyhow::Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .window_size(1920, 1080)
            .arg("--no-first-run");
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = self.executable.clone().or_else(find_chromium) {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(|e| anyhow!("invalid browser config: {e}"))
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>> {
        let config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .context("launching chromium")?;

        // The CDP handler must be polled for the browser to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("opening tab")?;
        debug!("chromium session opened");

        Ok(Box::new(ChromiumContext {
            browser,
            page,
            handler_task,
        }))
    }
}

/// A live Chromium tab.
pub struct ChromiumContext {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult> {
        let start = Instant::now();
        tokio::time::timeout(Duration::from_millis(timeout_ms), self.page.goto(url))
            .await
            .map_err(|_| anyhow!("navigation to {url} timed out after {timeout_ms}ms"))?
            .with_context(|| format!("navigating to {url}"))?;

        let final_url = self
            .page
            .url()
            .await
            .context("reading page url")?
            .unwrap_or_else(|| url.to_string());

        Ok(NavigationResult {
            final_url,
            load_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn title(&self) -> Result<String> {
        let title = self.page.get_title().await.context("reading title")?;
        Ok(title.unwrap_or_default())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.page.content().await.context("reading page source")?)
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| ScrapeError::missing(selector))?;
        element
            .click()
            .await
            .with_context(|| format!("clicking {selector}"))?;
        Ok(())
    }

    async fn element_text(&self, selector: &str) -> Result<String> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| ScrapeError::missing(selector))?;
        let text = element
            .inner_text()
            .await
            .with_context(|| format!("reading text of {selector}"))?;
        Ok(text.unwrap_or_default().trim().to_string())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let Self {
            mut browser,
            page: _,
            handler_task,
        } = *self;
        if let Err(e) = browser.close().await {
            warn!("chromium close failed: {e}");
        }
        let _ = browser.wait().await;
        handler_task.abort();
        debug!("chromium session closed");
        Ok(())
    }
}

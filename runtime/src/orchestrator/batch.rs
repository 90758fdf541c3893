//! Batch driver: every address in order, one failure never stops the rest.

use super::report::{format_report, write_report};
use super::scraper::AddressScraper;
use crate::cli::progress;
use crate::config::{Endpoints, RunConfig};
use crate::error::{Result, ScrapeError};
use crate::shutdown::Shutdown;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// What a batch run produced.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Reports written, in address order.
    pub written: Vec<PathBuf>,
    /// Addresses that produced no report, with the reason.
    pub failed: Vec<(String, String)>,
    /// Blank entries in the address list.
    pub skipped: usize,
}

/// Drives an [`AddressScraper`] across the configured address list.
pub struct Orchestrator<S> {
    scraper: S,
    addresses: Vec<String>,
    out_dir: PathBuf,
    endpoints: Endpoints,
    show_progress: bool,
}

impl<S: AddressScraper> Orchestrator<S> {
    pub fn new(scraper: S, config: &RunConfig) -> Self {
        Self {
            scraper,
            addresses: config.addresses.clone(),
            out_dir: config.out_dir.clone(),
            endpoints: config.scrape.endpoints.clone(),
            show_progress: config.show_progress,
        }
    }

    /// Process every address sequentially.
    ///
    /// Returns `Err` only when interrupted; no report is written after that.
    pub async fn run_all(&self, shutdown: &Shutdown) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        let total = self.addresses.len();

        for (index, raw) in self.addresses.iter().enumerate() {
            if shutdown.is_triggered() {
                return Err(ScrapeError::Interrupted);
            }

            let address = raw.trim();
            if address.is_empty() {
                warn!("skipping blank address at position {}", index + 1);
                summary.skipped += 1;
                continue;
            }

            let spinner = self
                .show_progress
                .then(|| progress::create_spinner(&format!("[{}/{total}] {address}", index + 1)));

            match self.process(address, shutdown).await {
                Ok(path) => {
                    if let Some(bar) = &spinner {
                        progress::finish_ok(bar, &format!("{address} -> {}", path.display()));
                    }
                    summary.written.push(path);
                }
                Err(ScrapeError::Interrupted) => {
                    if let Some(bar) = &spinner {
                        progress::finish_failed(bar, &format!("{address}: interrupted"));
                    }
                    return Err(ScrapeError::Interrupted);
                }
                Err(e) => {
                    error!("Error with {address}: {e}");
                    if let Some(bar) = &spinner {
                        progress::finish_failed(bar, &format!("{address}: {e}"));
                    }
                    summary.failed.push((address.to_string(), e.to_string()));
                }
            }
        }

        info!(
            "batch finished: {} written, {} failed, {} skipped",
            summary.written.len(),
            summary.failed.len(),
            summary.skipped
        );
        Ok(summary)
    }

    async fn process(&self, address: &str, shutdown: &Shutdown) -> Result<PathBuf> {
        let result = self.scraper.scrape(address, shutdown).await?;
        if shutdown.is_triggered() {
            return Err(ScrapeError::Interrupted);
        }
        let report = format_report(address, &result, &self.endpoints);
        info!("found wallets:\n{report}");
        Ok(write_report(&self.out_dir, address, &report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScrapeResult;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Fails for `bad`, interrupts at `stop`, returns an empty result otherwise.
    #[derive(Default)]
    struct Stub {
        bad: Option<&'static str>,
        stop: Option<&'static str>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AddressScraper for Stub {
        async fn scrape(&self, address: &str, _shutdown: &Shutdown) -> Result<ScrapeResult> {
            self.seen.lock().unwrap().push(address.to_string());
            if Some(address) == self.bad {
                return Err(anyhow::anyhow!("browser crashed").into());
            }
            if Some(address) == self.stop {
                return Err(ScrapeError::Interrupted);
            }
            Ok(ScrapeResult::empty())
        }
    }

    fn run_config(dir: &std::path::Path, addresses: &[&str]) -> RunConfig {
        RunConfig {
            addresses: addresses.iter().map(|a| a.to_string()).collect(),
            out_dir: dir.to_path_buf(),
            show_progress: false,
            ..RunConfig::default()
        }
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Stub {
            bad: Some("B"),
            ..Stub::default()
        };
        let orchestrator = Orchestrator::new(stub, &run_config(dir.path(), &["A", "B", "C"]));

        let logs = LogBuffer::default();
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let summary = orchestrator.run_all(&Shutdown::never()).await.unwrap();
        let logged = logs.contents();
        assert!(logged.contains("Error with B: browser crashed"), "{logged}");
        assert!(!logged.contains("Error with A"));
        assert_eq!(summary.written.len(), 2);
        assert!(dir.path().join("A_wallets.txt").exists());
        assert!(!dir.path().join("B_wallets.txt").exists());
        assert!(dir.path().join("C_wallets.txt").exists());
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, "B");
        assert!(summary.failed[0].1.contains("browser crashed"));
    }

    #[tokio::test]
    async fn test_interrupt_stops_batch() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Stub {
            stop: Some("B"),
            ..Stub::default()
        };
        let orchestrator = Orchestrator::new(stub, &run_config(dir.path(), &["A", "B", "C"]));

        let err = orchestrator.run_all(&Shutdown::never()).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Interrupted));
        assert!(dir.path().join("A_wallets.txt").exists());
        assert!(!dir.path().join("C_wallets.txt").exists());
        assert_eq!(*orchestrator.scraper.seen.lock().unwrap(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_triggered_shutdown_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (trigger, shutdown) = crate::shutdown::channel();
        trigger.trigger();
        let orchestrator = Orchestrator::new(Stub::default(), &run_config(dir.path(), &["A"]));

        assert!(orchestrator.run_all(&shutdown).await.is_err());
        assert!(!dir.path().join("A_wallets.txt").exists());
    }

    /// Trips the interrupt while finishing up, then reports success.
    struct InterruptedOnClose {
        trigger: crate::shutdown::ShutdownTrigger,
    }

    #[async_trait]
    impl AddressScraper for InterruptedOnClose {
        async fn scrape(&self, _address: &str, _shutdown: &Shutdown) -> Result<ScrapeResult> {
            self.trigger.trigger();
            Ok(ScrapeResult::empty())
        }
    }

    #[tokio::test]
    async fn test_interrupt_during_scrape_suppresses_report() {
        let dir = tempfile::tempdir().unwrap();
        let (trigger, shutdown) = crate::shutdown::channel();
        let orchestrator = Orchestrator::new(
            InterruptedOnClose { trigger },
            &run_config(dir.path(), &["A", "B"]),
        );

        let err = orchestrator.run_all(&shutdown).await.unwrap_err();
        assert!(matches!(err, ScrapeError::Interrupted));
        assert!(!dir.path().join("A_wallets.txt").exists());
        assert!(!dir.path().join("B_wallets.txt").exists());
    }

    #[tokio::test]
    async fn test_blank_addresses_skipped_and_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let orchestrator =
            Orchestrator::new(Stub::default(), &run_config(dir.path(), &["  ", " A "]));

        let summary = orchestrator.run_all(&Shutdown::never()).await.unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("A_wallets.txt")).unwrap(),
            "_Token:_ [--](https://dexscreener.com/solana/A)\n\n_No valid wallets_\n"
        );
    }
}

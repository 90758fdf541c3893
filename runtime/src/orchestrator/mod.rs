//! Run Orchestrator: per-address retry, report output, and the batch driver.

pub mod batch;
pub mod report;
pub mod retry;
pub mod scraper;

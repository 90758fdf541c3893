//! Error taxonomy for a scrape cycle.
//!
//! The retry loop in [`crate::orchestrator::retry`] keys its transitions off
//! these variants: everything except [`ScrapeError::NotFound`] and
//! [`ScrapeError::Interrupted`] consumes an attempt and is retried.

use thiserror::Error;

/// Errors raised while driving the token and wallet dashboards.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The anti-bot interstitial was still showing after navigation.
    #[error("antibot not passed ({url})")]
    NotReady { url: String },

    /// The trader list for a token address is structurally absent.
    #[error("no such address: {address}")]
    NotFound { address: String },

    /// An element the navigation sequence depends on was not on the page.
    #[error("no such element: {locator}")]
    StructureMissing { locator: String },

    /// The user asked the process to stop.
    #[error("interrupted")]
    Interrupted,

    /// Anything else: browser transport failures, unparsable numbers, etc.
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl ScrapeError {
    /// Build a [`ScrapeError::StructureMissing`] for a locator name.
    pub fn missing(locator: impl Into<String>) -> Self {
        Self::StructureMissing {
            locator: locator.into(),
        }
    }

    /// Whether another attempt should follow this error.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::Interrupted)
    }

    /// Short label used in attempt log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotReady { .. } => "antibot not passed",
            Self::NotFound { .. } => "no such address",
            Self::StructureMissing { .. } => "no such element",
            Self::Interrupted => "interrupted",
            Self::Unknown(_) => "unknown error",
        }
    }
}

/// Result alias used across the scraping layers.
pub type Result<T> = std::result::Result<T, ScrapeError>;

//! Extraction from the token and wallet dashboards.
//!
//! Parsing is split from driving: `token_page` and `wallet_page` turn HTML
//! into typed values synchronously (scraper's DOM is not `Send`), while
//! `extractor` drives a live [`crate::renderer::RenderContext`] through the
//! navigation sequence and hands rendered HTML to the parsers.

pub mod extractor;
pub mod locators;
pub mod token_page;
pub mod wallet_page;

//! Wallet Filter & Aggregator: which traders of a token are worth following.

pub mod aggregator;
pub mod policy;

//! CLI subcommand implementations for the walletscout binary.

pub mod doctor;
pub mod locators_cmd;
pub mod output;
pub mod progress;
pub mod run_cmd;

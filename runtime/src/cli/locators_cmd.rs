//! `walletscout locators`: print the built-in locator table.

use crate::extraction::locators::Locators;
use anyhow::Result;

/// Print the table as JSON, ready to edit and pass back with `--locators`.
pub fn run() -> Result<()> {
    println!("{}", Locators::embedded().to_json()?);
    Ok(())
}

//! `walletscout doctor`: check that a run can start.

use crate::cli::output::{self, Styled};
use crate::extraction::locators::Locators;
use crate::renderer::chromium::{chromium_version, find_chromium, CHROMIUM_PATH_ENV};
use anyhow::Result;
use std::path::Path;

/// Report on Chromium, the locator table, and the output directory.
pub async fn run(locators: Option<&Path>, out_dir: &Path) -> Result<()> {
    let s = Styled::new();
    let mut ready = true;
    output::print_header(&s);

    match find_chromium() {
        Some(path) => {
            let version = chromium_version(&path).unwrap_or_else(|| "unknown version".into());
            output::print_check(
                s.ok_sym(),
                "Chromium",
                &format!("{} ({version})", path.display()),
            );
        }
        None => {
            ready = false;
            output::print_check(s.fail_sym(), "Chromium", "not found");
            output::print_detail(&format!("Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}"));
        }
    }

    let table = match locators {
        Some(path) => Locators::from_file(path).map(|_| path.display().to_string()),
        None => Locators::embedded().validate().map(|_| "built-in".to_string()),
    };
    match table {
        Ok(source) => output::print_check(s.ok_sym(), "Locators", &source),
        Err(e) => {
            ready = false;
            output::print_check(s.fail_sym(), "Locators", &e.to_string());
        }
    }

    match check_writable(out_dir) {
        Ok(()) => output::print_check(s.ok_sym(), "Output dir", &out_dir.display().to_string()),
        Err(e) => {
            ready = false;
            output::print_check(s.fail_sym(), "Output dir", &e.to_string());
        }
    }

    eprintln!();
    if ready {
        eprintln!("  {}", s.green("Ready."));
    } else {
        eprintln!("  {}", s.red("Not ready."));
    }
    Ok(())
}

fn check_writable(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let marker = dir.join(".walletscout-write-check");
    std::fs::write(&marker, b"")?;
    std::fs::remove_file(&marker)?;
    Ok(())
}

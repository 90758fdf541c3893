//! Per-address spinners for batch runs.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("  {spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("\u{25b8}\u{25b9}\u{25b8}\u{25b9}\u{25b8}")
}

fn done_style() -> ProgressStyle {
    ProgressStyle::with_template("  {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Start a spinner for one address. Hidden when output is quiet.
pub fn create_spinner(message: &str) -> ProgressBar {
    if super::output::is_quiet() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    bar.set_style(spinner_style());
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

/// Mark an address as done.
pub fn finish_ok(bar: &ProgressBar, detail: &str) {
    bar.set_style(done_style());
    bar.finish_with_message(format!("\x1b[32m\u{2713}\x1b[0m {detail}"));
}

/// Mark an address as failed.
pub fn finish_failed(bar: &ProgressBar, detail: &str) {
    bar.set_style(done_style());
    bar.finish_with_message(format!("\x1b[31m\u{2717}\x1b[0m {detail}"));
}

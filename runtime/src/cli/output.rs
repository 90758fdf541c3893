//! Shared CLI output formatting with colors and status symbols.

use std::io::IsTerminal;

/// Environment flag set by `--quiet`.
pub const QUIET_ENV: &str = "WALLETSCOUT_QUIET";

/// Check if color output is enabled.
pub fn color_enabled() -> bool {
    // Respect NO_COLOR env (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}

impl Styled {
    pub fn new() -> Self {
        Self {
            use_color: color_enabled(),
        }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    /// Green checkmark symbol.
    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    /// Red X symbol.
    pub fn fail_sym(&self) -> &str {
        if self.use_color {
            "\x1b[31m\u{2717}\x1b[0m"
        } else {
            "!!"
        }
    }

    pub fn green(&self, s: &str) -> String {
        self.paint(GREEN, s)
    }

    pub fn red(&self, s: &str) -> String {
        self.paint(RED, s)
    }

    pub fn dim(&self, s: &str) -> String {
        self.paint(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.paint(BOLD, s)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Print a branded header for CLI output.
pub fn print_header(s: &Styled) {
    eprintln!(
        "  {} {}",
        s.bold("walletscout"),
        s.dim(&format!("v{}", env!("CARGO_PKG_VERSION")))
    );
    eprintln!();
}

/// Print a check result line with symbol and label/value.
pub fn print_check(symbol: &str, label: &str, value: &str) {
    eprintln!("    {symbol} {label:<16} {value}");
}

/// Print an indented detail/fix line under a check.
pub fn print_detail(msg: &str) {
    eprintln!("                        {msg}");
}

/// Check if --quiet mode is active.
pub fn is_quiet() -> bool {
    std::env::var(QUIET_ENV).is_ok()
}

//! Output formatting for CLI commands
//!
//! Human-readable output is colored (respects NO_COLOR); JSON output is meant
//! for scripting.

use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Color scheme for CLI output
pub mod colors {
    use colored::{ColoredString, Colorize};

    pub fn label(s: &str) -> ColoredString {
        s.bold()
    }

    pub fn uri(s: &str) -> ColoredString {
        s.blue()
    }

    pub fn number(s: &str) -> ColoredString {
        s.yellow()
    }

    pub fn success(s: &str) -> ColoredString {
        s.green()
    }

    pub fn warning(s: &str) -> ColoredString {
        s.yellow()
    }

    pub fn error(s: &str) -> ColoredString {
        s.red().bold()
    }

    pub fn dim(s: &str) -> ColoredString {
        s.dimmed()
    }

    pub fn score(s: &str) -> ColoredString {
        s.magenta()
    }

    pub fn rank(s: &str) -> ColoredString {
        s.green().bold()
    }
}

/// HTTP status, green for 2xx and red otherwise
pub fn status(code: u16) -> colored::ColoredString {
    if (200..300).contains(&code) {
        colors::success(&code.to_string())
    } else {
        colors::error(&code.to_string())
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", colors::warning("warning:"), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", colors::error("error:"), message);
}

/// Collapse whitespace and cut long text for one-line display
pub fn one_line(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. The doctor
//! report is a line per check: emoji, object name, and the (possibly
//! multi-line, already indented) status text.

use std::fmt::Display;

use crate::check::{CheckResult, Outcome};
use crate::runner::IndexedResult;

/// ANSI sequence that clears the terminal between watch iterations.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Emoji for an outcome: hourglass pending, cross failing, check healthy.
pub fn outcome_emoji(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Pending => "⌛",
        Outcome::Failing => "❌",
        Outcome::Healthy => "✔️",
    }
}

/// Format one report line.
pub fn format_result_line(name: &str, result: &CheckResult) -> String {
    format!(
        "{} {} status: {}",
        outcome_emoji(result.outcome),
        name,
        result.status
    )
}

/// Format a whole report, one line per check, in the given order.
pub fn format_report(results: &[IndexedResult]) -> String {
    results
        .iter()
        .map(|r| format_result_line(&r.name, &r.result))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emoji_per_outcome() {
        assert_eq!(outcome_emoji(Outcome::Pending), "⌛");
        assert_eq!(outcome_emoji(Outcome::Failing), "❌");
        assert_eq!(outcome_emoji(Outcome::Healthy), "✔️");
    }

    #[test]
    fn result_line_format() {
        let result = CheckResult {
            outcome: Outcome::Healthy,
            status: "Release reconciliation succeeded".to_string(),
            ..CheckResult::default()
        };

        assert_eq!(
            format_result_line("cert-manager", &result),
            "✔️ cert-manager status: Release reconciliation succeeded"
        );
    }

    #[test]
    fn report_joins_lines() {
        let results = vec![
            IndexedResult {
                index: 0,
                name: "a".to_string(),
                result: CheckResult::default(),
            },
            IndexedResult {
                index: 1,
                name: "b".to_string(),
                result: CheckResult::fetch_failure(),
            },
        ];

        let report = format_report(&results);
        assert_eq!(report, "⌛ a status: \n❌ b status: ");
    }

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }
}

//! ui
//!
//! User-facing output utilities.

pub mod output;

pub use output::{format_report, format_result_line, outcome_emoji, Verbosity};

//! Output formatting for CLI

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use ringboot_core::VerificationResult;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable format
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Verdict colored by outcome.
pub fn verdict(result: VerificationResult) -> ColoredString {
    let text = result.to_string();
    match result {
        VerificationResult::Yes => text.green().bold(),
        VerificationResult::Maybe => text.yellow().bold(),
        VerificationResult::No => text.red().bold(),
    }
}

/// The halt line a boot sector would print before halting.
pub fn halt_line(code: u8) -> String {
    format!("HALT CODE: 0x{:02X}", code)
}

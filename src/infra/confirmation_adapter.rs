use std::io::{self, BufRead, Write};

use crate::app::ports::ConfirmationPort;
use crate::error::{CleanerError, Result};
use crate::pipeline::processing::validate::ValidationSummary;

/// Asks the operator on the terminal whether to continue with only the valid records
pub struct ConsoleConfirmation;

impl ConfirmationPort for ConsoleConfirmation {
    fn confirm_continue(&self, summary: &ValidationSummary) -> Result<bool> {
        print_counts(summary);
        println!("\nWarning: {} invalid records found.", summary.invalid);
        print!("Continue with only valid records? (y/n): ");
        io::stdout().flush().map_err(prompt_error)?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .map_err(prompt_error)?;
        Ok(is_yes(&answer))
    }
}

/// Continues without asking, for non-interactive runs
pub struct AssumeYesConfirmation;

impl ConfirmationPort for AssumeYesConfirmation {
    fn confirm_continue(&self, summary: &ValidationSummary) -> Result<bool> {
        print_counts(summary);
        println!(
            "\nWarning: {} invalid records found. Continuing with only valid records.",
            summary.invalid
        );
        Ok(true)
    }
}

/// The "Validation Results" block shown before the gate or after a clean run
pub fn print_counts(summary: &ValidationSummary) {
    println!("\nValidation Results:");
    println!("Total records: {}", summary.total);
    println!("Valid records: {}", summary.valid);
    println!("Invalid records: {}", summary.invalid);
}

fn prompt_error(source: io::Error) -> CleanerError {
    CleanerError::Read {
        path: "<stdin>".into(),
        source,
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_y_continues() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  Y "));
        assert!(!is_yes("yes"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }
}

// Coloured run summary on stderr.
//
// stdout carries only the Markdown report, so anything meant for a human
// watching the run goes to stderr.

use colored::Colorize;

use crate::pipeline::scan::ScanSummary;

/// Print counts for a finished run.
pub fn display_summary(summary: &ScanSummary) {
    eprintln!("{}", "=== Moderation sweep ===".bold());
    eprintln!("  Comments fetched:    {}", summary.fetched);
    eprintln!("  Comments classified: {}", summary.classified);

    if summary.skipped > 0 {
        eprintln!(
            "  {} {} comment(s) could not be classified and were skipped",
            "!".yellow().bold(),
            summary.skipped
        );
    }

    if summary.flagged > 0 {
        eprintln!(
            "  {} {} comment(s) flagged",
            "!!".red().bold(),
            summary.flagged
        );
    } else {
        eprintln!("  {}", "Nothing flagged".green());
    }
}

/// Print a fatal error with a coloured prefix, including its cause chain.
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".red().bold(), error);
}

// Markdown report: one table row per flagged comment, or a fixed sentinel line.

use crate::filter::FlaggedEntry;

/// Printed instead of a table when nothing was flagged.
pub const NO_CONCERNS: &str = "_No policy concerns detected in the selected window._";

const TABLE_HEADER: &str = "| User | Comment | Reason |\n|------|---------|--------|";

/// Render flagged entries as a Markdown table, in the order given.
pub fn render_report(entries: &[FlaggedEntry]) -> String {
    if entries.is_empty() {
        return NO_CONCERNS.to_string();
    }

    let mut report = String::from(TABLE_HEADER);
    for entry in entries {
        report.push('\n');
        report.push_str(&render_row(entry));
    }
    report
}

fn render_row(entry: &FlaggedEntry) -> String {
    format!(
        "| {} | [link]({}) | {} |",
        escape_cell(&entry.author),
        escape_cell(&entry.permalink),
        escape_cell(&format_reasons(entry)),
    )
}

/// `category (score)` pairs joined by ", ", scores to two decimals.
pub fn format_reasons(entry: &FlaggedEntry) -> String {
    entry
        .reasons
        .iter()
        .map(|r| format!("{} ({:.2})", r.display_name(), r.score))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Make text safe inside a table cell: pipes escaped, line breaks flattened.
pub fn escape_cell(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '|' => out.push_str("\\|"),
            '\r' | '\n' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

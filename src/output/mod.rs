// Output formatting: the Markdown report on stdout and the run summary on stderr.

pub mod markdown;
pub mod terminal;

/// One-line excerpt of a comment body for log fields.
///
/// Whitespace runs (including newlines from multi-paragraph comments) are
/// collapsed to single spaces, then the result is cut to `max_chars`
/// characters with "..." appended when anything was dropped.
pub fn log_preview(text: &str, max_chars: usize) -> String {
    let mut words = text.split_whitespace();
    let mut flat = String::new();
    if let Some(first) = words.next() {
        flat.push_str(first);
        for word in words {
            flat.push(' ');
            flat.push_str(word);
        }
    }

    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}

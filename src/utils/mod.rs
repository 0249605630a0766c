// src/utils/mod.rs

//! Utility functions and helpers.

pub mod http;

/// First `max_chars` characters of `text`, with an ellipsis when cut.
pub fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

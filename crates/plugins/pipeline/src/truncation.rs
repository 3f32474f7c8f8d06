//! Truncation utilities for limiting output size.
//!
//! Lengths are counted in characters, so multi-byte text is never split
//! inside a code point.

/// Truncate a string to `max_chars`, preferring line and word boundaries.
/// The returned string is at most `max_chars` characters long, ellipsis
/// included.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    // Account for ellipsis in the limit
    let content_limit = max_chars.saturating_sub(3);
    if content_limit == 0 {
        return "...".to_string();
    }

    let cut = s
        .char_indices()
        .nth(content_limit)
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let truncated = &s[..cut];

    for boundary in ['\n', ' '] {
        if let Some(pos) = truncated.rfind(boundary) {
            if truncated[..pos].chars().count() > content_limit / 2 {
                return format!("{}...", truncated[..pos].trim_end());
            }
        }
    }

    format!("{}...", truncated)
}

/// Shorten a commit hash for display.
pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(8) {
        Some((i, _)) => &sha[..i],
        None => sha,
    }
}

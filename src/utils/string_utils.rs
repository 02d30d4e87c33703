//! Document and log text helpers

/// Remove a leading UTF-8 byte order mark, common in exported `.srt` files
#[inline]
#[must_use]
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// Truncate to at most `max_chars` characters on a char boundary
///
/// Used to keep user-supplied queries readable in log lines.
#[inline]
#[must_use]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

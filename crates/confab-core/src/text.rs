//! UTF-8-safe text helpers for log output.

/// Shorten `s` to at most `max_bytes` bytes for logging, appending `…`
/// when anything was cut.
///
/// `&str[..n]` panics when `n` falls inside a multi-byte character, so
/// the cut point snaps back to the nearest char boundary.
#[must_use]
pub fn preview(s: &str, max_bytes: usize) -> String {
    if s.len() <= max_bytes {
        return s.to_owned();
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &s[..end])
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

//! Shared helper functions for SQL dialect implementations.

// =============================================================================
// String Quoting
// =============================================================================

/// Quote a string literal with single quotes.
///
/// Embedded `'` is doubled. When `backslash_escape` is set, `\` is doubled
/// as well, for engines that treat backslash as an escape inside literals.
pub fn quoted_string(s: &str, backslash_escape: bool) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' if backslash_escape => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

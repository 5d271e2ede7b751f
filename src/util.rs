//! Small shared helpers used by the parser and git layers.

/// Strip single and double quotes from a token.
///
/// Fields extracted from git output may arrive wrapped in quotation marks
/// depending on the format string; all comparison and display happens on the
/// stripped value.
pub fn strip_quotes(s: &str) -> String {
    s.replace(['"', '\''], "")
}

/// Whether a version token looks like a commit hash.
///
/// A non-empty string of hex digits is treated as a commit; anything else
/// (tag name, branch name, semver string) is a branch/tag pin.
pub fn is_hex_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}

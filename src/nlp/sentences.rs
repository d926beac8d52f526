use once_cell::sync::Lazy;
use regex::Regex;

static TERMINATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!]").expect("valid sentence terminator regex"));

/// Splits a comment at every `.` or `!`. Empty segments, including the one
/// after a trailing terminator, are kept.
pub fn split_sentences(comment: &str) -> Vec<&str> {
    TERMINATORS.split(comment).collect()
}

//! Comment removal pre-pass.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Quoted strings (kept) or line comments (dropped), whichever starts first.
///
/// Neither alternative can match a newline, so stripping only ever removes
/// the tail of a line.
static QUOTED_OR_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|[\t ]*#[^\n]*"#)
        .expect("comment pattern is valid")
});

/// Remove `#` line comments, leaving quoted strings untouched.
///
/// A `#` inside a single- or double-quoted string on the same line is part
/// of the string. Whitespace directly before a comment goes with it.
/// Newlines are never removed, so every surviving byte keeps its line and
/// column.
pub fn strip_comments(source: &str) -> Cow<'_, str> {
    QUOTED_OR_COMMENT.replace_all(source, |caps: &Captures<'_>| {
        let text = &caps[0];
        if text.starts_with('"') || text.starts_with('\'') {
            text.to_string()
        } else {
            String::new()
        }
    })
}

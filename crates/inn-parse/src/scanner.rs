//! Greedy, regex-driven recognition of the four inn productions.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::trace;

use crate::unescape;

/// `class word {` where word is double-quoted, single-quoted or bare.
static NAMED_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*([\w-]+)\s+(?:"((?:[^"\\\n]|\\.)*)"|'((?:[^'\\\n]|\\.)*)'|([^\s{}]+))\s*\{"#,
    )
    .expect("named block pattern is valid")
});

/// `class {`
static ANON_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([\w-]+)\s*\{").expect("block pattern is valid"));

/// `}`
static CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\}").expect("close pattern is valid"));

/// `key: "value"`, `key: 'value'` or `key: value`, tried in that order.
static KEY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*([\w-]+):\s+(?:"((?:[^"\\\n]|\\.)*)"|'((?:[^'\\\n]|\\.)*)'|(\S+))"#)
        .expect("key-value pattern is valid")
});

/// A grammar match at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Production<'src> {
    /// `class word {`
    NamedOpen {
        class: &'src str,
        word: Cow<'src, str>,
    },
    /// `class {`
    AnonOpen { class: &'src str },
    /// `}`
    Close,
    /// `key: value`
    KeyValue {
        key: &'src str,
        value: Cow<'src, str>,
    },
}

/// Walks comment-free source one production at a time.
///
/// The cursor only moves forward, past the whole match of the production
/// it just returned.
pub(crate) struct Scanner<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Scanner<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    /// Byte offset of the next significant (non-whitespace) character.
    pub(crate) fn position(&self) -> usize {
        let rest = &self.source[self.pos..];
        self.pos + (rest.len() - rest.trim_start().len())
    }

    /// Whether only whitespace remains.
    pub(crate) fn at_end(&self) -> bool {
        self.source[self.pos..].trim_start().is_empty()
    }

    /// Match the next production, or `None` if nothing matches here.
    pub(crate) fn next_production(&mut self) -> Option<Production<'src>> {
        let rest: &'src str = &self.source[self.pos..];

        if let Some(caps) = NAMED_OPEN.captures(rest) {
            let class = group(&caps, 1);
            let word = quoted_or_bare(&caps, 2);
            trace!(class, word = %word, "named block open");
            self.advance(&caps);
            return Some(Production::NamedOpen { class, word });
        }
        if let Some(caps) = ANON_OPEN.captures(rest) {
            let class = group(&caps, 1);
            trace!(class, "anonymous block open");
            self.advance(&caps);
            return Some(Production::AnonOpen { class });
        }
        if let Some(caps) = CLOSE.captures(rest) {
            trace!("block close");
            self.advance(&caps);
            return Some(Production::Close);
        }
        if let Some(caps) = KEY_VALUE.captures(rest) {
            let key = group(&caps, 1);
            let value = quoted_or_bare(&caps, 2);
            trace!(key, value = %value, "key-value pair");
            self.advance(&caps);
            return Some(Production::KeyValue { key, value });
        }
        None
    }

    fn advance(&mut self, caps: &Captures<'src>) {
        let whole = caps.get(0).map(|m| m.end()).unwrap_or(0);
        self.pos += whole;
    }
}

fn group<'src>(caps: &Captures<'src>, index: usize) -> &'src str {
    caps.get(index).map(|m| m.as_str()).unwrap_or("")
}

/// Pick whichever of the double-quoted, single-quoted or bare groups
/// (starting at `first`) matched. Quoted text is unescaped.
fn quoted_or_bare<'src>(caps: &Captures<'src>, first: usize) -> Cow<'src, str> {
    if let Some(m) = caps.get(first) {
        return unescape(m.as_str());
    }
    if let Some(m) = caps.get(first + 1) {
        return unescape(m.as_str());
    }
    Cow::Borrowed(group(caps, first + 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    fn scan_all(source: &str) -> Vec<Production<'_>> {
        let mut scanner = Scanner::new(source);
        std::iter::from_fn(|| scanner.next_production()).collect()
    }

    #[test]
    fn test_named_block() {
        assert_eq!(
            scan_all("server web1 {"),
            vec![Production::NamedOpen {
                class: "server",
                word: "web1".into()
            }]
        );
    }

    #[test]
    fn test_named_block_with_quoted_word() {
        assert_eq!(
            scan_all(r#"server "web \"one\"" {"#),
            vec![Production::NamedOpen {
                class: "server",
                word: "web \"one\"".into()
            }]
        );
        assert_eq!(
            scan_all("server 'web1'{"),
            vec![Production::NamedOpen {
                class: "server",
                word: "web1".into()
            }]
        );
    }

    #[test]
    fn test_anonymous_block_and_close() {
        assert_eq!(
            scan_all("  upstream{\n}"),
            vec![Production::AnonOpen { class: "upstream" }, Production::Close]
        );
    }

    #[test]
    fn test_key_value_forms() {
        assert_eq!(
            scan_all("a: \"x y\"\nb: 'it\\'s'\nc: bare-word\n"),
            vec![
                Production::KeyValue {
                    key: "a",
                    value: "x y".into()
                },
                Production::KeyValue {
                    key: "b",
                    value: "it's".into()
                },
                Production::KeyValue {
                    key: "c",
                    value: "bare-word".into()
                },
            ]
        );
    }

    #[test]
    fn test_bare_value_is_verbatim() {
        assert_eq!(
            scan_all(r"path: C:\temp\n"),
            vec![Production::KeyValue {
                key: "path",
                value: r"C:\temp\n".into()
            }]
        );
    }

    #[test]
    fn test_empty_quoted_value() {
        assert_eq!(
            scan_all(r#"name: """#),
            vec![Production::KeyValue {
                key: "name",
                value: "".into()
            }]
        );
    }

    #[test]
    fn test_stops_at_unrecognised_input() {
        let mut scanner = Scanner::new("a: b\n  ???");
        assert!(scanner.next_production().is_some());
        assert_eq!(scanner.next_production(), None);
        assert_eq!(scanner.position(), 7);
        assert!(!scanner.at_end());
    }

    #[test]
    fn test_key_requires_space_after_colon() {
        assert_eq!(scan_all("a:b"), vec![]);
    }
}

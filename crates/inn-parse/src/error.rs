//! Syntax errors and their rendering.

use std::fmt;

use ariadne::{Color, Label, Report, ReportKind, Source};

/// Result type for parse operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A `}` with no open block to close.
    UnexpectedClose,
    /// Input ended (or stopped matching the grammar) while blocks were open.
    UnexpectedEof,
    /// Blocks nested deeper than the configured limit.
    TooDeep {
        /// The configured maximum depth.
        limit: usize,
    },
    /// Input bytes are not valid UTF-8.
    InvalidUtf8 {
        /// Length of the longest valid prefix.
        valid_up_to: usize,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnexpectedClose => write!(f, "unexpected '}}'"),
            ParseErrorKind::UnexpectedEof => write!(f, "unexpected EOF"),
            ParseErrorKind::TooDeep { limit } => {
                write!(f, "blocks nested deeper than {limit} levels")
            }
            ParseErrorKind::InvalidUtf8 { valid_up_to } => {
                write!(f, "invalid UTF-8 after byte {valid_up_to}")
            }
        }
    }
}

/// A 1-based line and byte column.
///
/// Comment stripping only removes line tails, so a location computed on
/// stripped text points at the same byte in the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: u32,
    /// Byte column within the line, starting at 1.
    pub column: u32,
}

impl Location {
    /// Compute the location of byte `offset` in `text`.
    pub fn of_offset(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let before = &text.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        Self {
            line,
            column: (offset - line_start) as u32 + 1,
        }
    }

    /// The byte offset this location refers to in `text`, clamped to its length.
    pub fn offset_in(&self, text: &str) -> usize {
        let mut line_start = 0;
        for _ in 1..self.line {
            match text[line_start..].find('\n') {
                Some(i) => line_start += i + 1,
                None => return text.len(),
            }
        }
        (line_start + self.column as usize - 1).min(text.len())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A syntax error with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// Where it happened.
    pub location: Location,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Render this error with ariadne against the original source text.
    pub fn render(&self, filename: &str, source: &str) -> String {
        let mut output = Vec::new();
        self.write_report(filename, source, &mut output);
        String::from_utf8(output).unwrap_or_else(|_| format!("{}", self))
    }

    /// Write the error report to a writer.
    pub fn write_report<W: std::io::Write>(&self, filename: &str, source: &str, writer: W) {
        let start = self.location.offset_in(source);
        let end = (start + 1).min(source.len()).max(start);
        let range = start..end;

        let (label, help) = match &self.kind {
            ParseErrorKind::UnexpectedClose => (
                "no open block to close",
                Some("remove the extra '}' or open a block before it"),
            ),
            ParseErrorKind::UnexpectedEof => (
                "expected a block, '}' or `key: value` here",
                Some("every block opened with '{' needs a matching '}'"),
            ),
            ParseErrorKind::TooDeep { .. } => ("this block is nested too deeply", None),
            ParseErrorKind::InvalidUtf8 { .. } => ("invalid UTF-8 starts here", None),
        };

        let mut report = Report::build(ReportKind::Error, (filename, range.clone()))
            .with_message(self.kind.to_string())
            .with_label(
                Label::new((filename, range))
                    .with_message(label)
                    .with_color(Color::Red),
            );
        if let Some(help) = help {
            report = report.with_help(help);
        }
        let _ = report
            .finish()
            .write((filename, Source::from(source)), writer);
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.location)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_location_of_offset() {
        let text = "a: b\nc {\n}";
        assert_eq!(Location::of_offset(text, 0), Location { line: 1, column: 1 });
        assert_eq!(Location::of_offset(text, 5), Location { line: 2, column: 1 });
        assert_eq!(Location::of_offset(text, 7), Location { line: 2, column: 3 });
        assert_eq!(Location::of_offset(text, 99), Location { line: 3, column: 2 });
    }

    #[test]
    fn test_offset_in_roundtrips() {
        let text = "a: b\nc {\n}";
        for offset in 0..=text.len() {
            assert_eq!(Location::of_offset(text, offset).offset_in(text), offset);
        }
    }

    #[test]
    fn test_offset_in_original_with_comments() {
        let original = "a { # open\n}\n} # stray";
        let location = Location { line: 3, column: 1 };
        assert_eq!(&original[location.offset_in(original)..], "} # stray");
    }

    #[test]
    fn test_display() {
        let err = ParseError::new(
            ParseErrorKind::UnexpectedClose,
            Location { line: 3, column: 1 },
        );
        assert_eq!(err.to_string(), "unexpected '}' at 3:1");
    }
}

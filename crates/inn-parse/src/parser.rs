//! Callback-driven parser for inn documents.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::error::{Location, ParseError, ParseErrorKind, Result};
use crate::scanner::{Production, Scanner};
use crate::{ContentHandler, Event, Ignore, strip_comments};

/// Parse `source` and drive `handler` with its contents.
///
/// Comments are stripped first. On success the handler has seen every
/// block and pair in document order followed by one final `end_element`.
/// On error the parse stops at the offending input; the handler keeps
/// whatever it was told up to that point.
pub fn parse<H: ContentHandler>(source: &str, handler: &mut H) -> Result<()> {
    Parser::new(source).parse(handler)
}

/// Like [`parse`], for input that has not been checked for UTF-8 yet.
pub fn parse_bytes<H: ContentHandler>(source: &[u8], handler: &mut H) -> Result<()> {
    parse(check_utf8(source)?, handler)
}

/// View `source` as text, or report where the invalid UTF-8 starts.
pub fn check_utf8(source: &[u8]) -> Result<&str> {
    std::str::from_utf8(source).map_err(|e| {
        let valid_up_to = e.valid_up_to();
        // the prefix up to `valid_up_to` is valid by definition
        let prefix = std::str::from_utf8(&source[..valid_up_to]).unwrap_or_default();
        ParseError::new(
            ParseErrorKind::InvalidUtf8 { valid_up_to },
            Location::of_offset(prefix, valid_up_to),
        )
    })
}

/// Nesting limit applied unless [`Parser::max_depth`] says otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parser for inn documents.
///
/// The parse stack is the call stack: opening a block recurses with the
/// child handler, which borrows from its parent, so the parent cannot be
/// driven again until the child's block has closed. Nesting is therefore
/// capped at [`DEFAULT_MAX_DEPTH`] by default.
pub struct Parser<'src> {
    source: Cow<'src, str>,
    max_depth: Option<usize>,
}

impl<'src> Parser<'src> {
    /// Create a parser for `source`. Comments are stripped here, once.
    pub fn new(source: &'src str) -> Self {
        Self {
            source: strip_comments(source),
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }

    /// Limit how deeply blocks may nest (default: [`DEFAULT_MAX_DEPTH`]).
    ///
    /// `None` lifts the limit; deep enough input then exhausts the stack.
    pub fn max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }

    /// The comment-free text being parsed.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parse and drive `handler`.
    pub fn parse<H: ContentHandler>(&self, handler: &mut H) -> Result<()> {
        let mut scanner = Scanner::new(&self.source);
        self.parse_block(&mut scanner, handler, 0)
    }

    /// Convenience: parse and record every callback.
    pub fn parse_to_vec(&self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        self.parse(&mut events)?;
        Ok(events)
    }

    fn parse_block(
        &self,
        scanner: &mut Scanner<'_>,
        handler: &mut dyn ContentHandler,
        depth: usize,
    ) -> Result<()> {
        loop {
            let start = scanner.position();
            match scanner.next_production() {
                Some(Production::NamedOpen { class, word }) => {
                    self.open_block(scanner, handler, class, &word, depth, start)?;
                }
                Some(Production::AnonOpen { class }) => {
                    self.open_block(scanner, handler, class, "", depth, start)?;
                }
                Some(Production::Close) => {
                    if depth == 0 {
                        return Err(self.error(ParseErrorKind::UnexpectedClose, start));
                    }
                    handler.end_element();
                    return Ok(());
                }
                Some(Production::KeyValue { key, value }) => {
                    handler.key_value_pair(key, &value);
                }
                None => {
                    if depth > 0 {
                        return Err(self.error(ParseErrorKind::UnexpectedEof, start));
                    }
                    if !scanner.at_end() {
                        debug!(
                            location = %Location::of_offset(&self.source, start),
                            "ignoring trailing input that matches no production"
                        );
                    }
                    handler.end_element();
                    return Ok(());
                }
            }
        }
    }

    fn open_block(
        &self,
        scanner: &mut Scanner<'_>,
        handler: &mut dyn ContentHandler,
        class: &str,
        word: &str,
        depth: usize,
        start: usize,
    ) -> Result<()> {
        if let Some(limit) = self.max_depth
            && depth >= limit
        {
            return Err(self.error(ParseErrorKind::TooDeep { limit }, start));
        }
        trace!(class, word, depth, "entering block");
        let mut child = handler
            .start_element(class, word)
            .unwrap_or_else(|| Box::new(Ignore));
        self.parse_block(scanner, &mut *child, depth + 1)
    }

    fn error(&self, kind: ParseErrorKind, offset: usize) -> ParseError {
        ParseError::new(kind, Location::of_offset(&self.source, offset))
    }
}

#[cfg(test)]
mod tests;

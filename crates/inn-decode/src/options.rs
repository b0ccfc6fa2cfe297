//! Decoding options.

use facet_core::Facet;
use inn_parse::DEFAULT_MAX_DEPTH;

use crate::{Decode, DecodeError, Error, Result, TextDecoder};

/// What to do with values that cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Skip them and keep going (default).
    #[default]
    Lenient,
    /// Keep going, then fail with every skipped value.
    Strict,
}

impl Mode {
    /// Turn the skipped values of a finished decode into a result.
    pub fn check(self, skipped: Vec<DecodeError>) -> Result<()> {
        match self {
            Mode::Strict if !skipped.is_empty() => Err(Error::Decode(skipped)),
            _ => Ok(()),
        }
    }
}

/// Options for decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Lenient or strict handling of undecodable values (default: lenient)
    pub mode: Mode,

    /// Maximum block nesting depth (default: [`DEFAULT_MAX_DEPTH`])
    pub max_depth: Option<usize>,

    /// Text decoders for types beyond the built-in ones
    pub decoders: Vec<TextDecoder>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            max_depth: Some(DEFAULT_MAX_DEPTH),
            decoders: Vec::new(),
        }
    }
}

impl DecodeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on any value that could not be decoded.
    pub fn strict(mut self) -> Self {
        self.mode = Mode::Strict;
        self
    }

    /// Silently skip values that could not be decoded.
    pub fn lenient(mut self) -> Self {
        self.mode = Mode::Lenient;
        self
    }

    /// Limit block nesting depth. `None` lifts the limit.
    pub fn max_depth(mut self, limit: Option<usize>) -> Self {
        self.max_depth = limit;
        self
    }

    /// Decode `T` values with its [`Decode`] implementation.
    ///
    /// Takes precedence over the built-in decoder for the same type.
    pub fn decoder<T>(mut self) -> Self
    where
        T: Decode + Facet<'static> + 'static,
    {
        self.decoders.push(TextDecoder::of::<T>());
        self
    }
}

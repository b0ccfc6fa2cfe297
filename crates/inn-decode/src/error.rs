//! Error types for inn-decode.

use std::fmt;

use inn_parse::ParseError;

use crate::{Kind, SchemaError, Sigil};

/// Why a single value or block could not be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The destination type has no textual form.
    Unsupported {
        /// Destination type.
        type_name: &'static str,
    },
    /// Not an integer literal.
    InvalidInteger {
        /// The offending text.
        raw: String,
    },
    /// An integer that does not fit the destination type.
    OutOfRange {
        /// The offending text.
        raw: String,
        /// Destination type.
        type_name: &'static str,
    },
    /// Not a floating point literal.
    InvalidFloat {
        /// The offending text.
        raw: String,
    },
    /// Not one of `true/t/yes/y/false/f/no/n`.
    InvalidBool {
        /// The offending text.
        raw: String,
    },
    /// Rejected by a custom [`Decode`](crate::Decode) implementation.
    Invalid {
        /// The offending text.
        raw: String,
        /// Destination type.
        type_name: &'static str,
    },
    /// A key with no matching field.
    UnknownField,
    /// A block class with no matching field.
    UnknownBlock,
    /// A block addressed at a type that cannot hold one.
    NotABlock {
        /// Destination type.
        type_name: &'static str,
    },
    /// The field's sigil asks for a list or map but its type is not one.
    SigilMismatch {
        /// The declared sigil.
        sigil: Sigil,
        /// What the field actually is.
        kind: Kind,
    },
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::Unsupported { type_name } => {
                write!(f, "unsupported value kind `{type_name}`")
            }
            DecodeErrorKind::InvalidInteger { raw } => write!(f, "invalid integer {raw:?}"),
            DecodeErrorKind::OutOfRange { raw, type_name } => {
                write!(f, "{raw:?} is out of range for `{type_name}`")
            }
            DecodeErrorKind::InvalidFloat { raw } => write!(f, "invalid float {raw:?}"),
            DecodeErrorKind::InvalidBool { raw } => write!(f, "invalid boolean {raw:?}"),
            DecodeErrorKind::Invalid { raw, type_name } => {
                write!(f, "invalid `{type_name}` {raw:?}")
            }
            DecodeErrorKind::UnknownField => write!(f, "no such field"),
            DecodeErrorKind::UnknownBlock => write!(f, "no such block"),
            DecodeErrorKind::NotABlock { type_name } => {
                write!(f, "`{type_name}` cannot be decoded from a block")
            }
            DecodeErrorKind::SigilMismatch { sigil, kind } => {
                write!(f, "sigil `{sigil}` does not fit a {kind} field")
            }
        }
    }
}

/// A value or block that was skipped, and the key or class it was under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// The key (for pairs) or class (for blocks). Empty at the root.
    pub key: String,
    /// What went wrong.
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    /// Create a new decode error.
    pub fn new(key: impl Into<String>, kind: DecodeErrorKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.key.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "`{}`: {}", self.key, self.kind)
        }
    }
}

impl std::error::Error for DecodeError {}

/// Error type for inn-decode operations.
#[derive(Debug)]
pub enum Error {
    /// The document is not syntactically valid.
    Parse(ParseError),
    /// Strict mode only: values that could not be decoded, in document order.
    Decode(Vec<DecodeError>),
    /// A record type whose field annotations are malformed.
    Schema {
        /// The record type.
        type_name: &'static str,
        /// What is wrong with it.
        source: SchemaError,
    },
    /// The value could not be assembled, typically because a type the
    /// document never mentions has no default.
    Reflect(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(e) => write!(f, "{e}"),
            Error::Decode(errors) => {
                write!(f, "{} value(s) could not be decoded", errors.len())?;
                for error in errors {
                    write!(f, "\n  {error}")?;
                }
                Ok(())
            }
            Error::Schema { type_name, source } => {
                write!(f, "invalid record declaration for `{type_name}`: {source}")
            }
            Error::Reflect(message) => write!(f, "cannot build value: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse(e) => Some(e),
            Error::Decode(errors) => errors
                .first()
                .map(|e| e as &(dyn std::error::Error + 'static)),
            Error::Schema { source, .. } => Some(source),
            Error::Reflect(_) => None,
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}

/// Result type for inn-decode operations.
pub type Result<T> = std::result::Result<T, Error>;

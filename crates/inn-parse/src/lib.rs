#![doc = include_str!("../README.md")]

mod error;
pub use error::{Location, ParseError, ParseErrorKind, Result};

mod event;
pub use event::Event;

mod handler;
pub use handler::{ContentHandler, Ignore};

mod parser;
pub use parser::{DEFAULT_MAX_DEPTH, Parser, check_utf8, parse, parse_bytes};

mod scanner;

mod strip;
pub use strip::strip_comments;

mod unescape;
pub use unescape::unescape;

#![doc = include_str!("../README.md")]

mod cursor;

mod decode;
pub use decode::{Decode, TextDecoder};

mod error;
pub use error::{DecodeError, DecodeErrorKind, Error, Result};

mod handler;
pub use handler::Decoder;

mod number;
pub use number::Number;

mod options;
pub use options::{DecodeOptions, Mode};

mod report;
pub use report::Report;

mod scalar;

mod schema;
pub use schema::{FieldSpec, Kind, Schema, SchemaError, Sigil};

use facet_core::Facet;
use inn_parse::Parser;

/// Decode `source` into an existing value.
///
/// Only what the document mentions is touched; every other field keeps
/// its current value. On a parse error, everything decoded before the
/// error is kept. If the value cannot be built at all, `target` is left
/// at its default.
pub fn decode_into<T>(source: &str, target: &mut T, options: &DecodeOptions) -> Result<()>
where
    T: Facet<'static> + Default,
{
    let mut decoder = Decoder::with_value(std::mem::take(target), options)?;
    let parsed = Parser::new(source)
        .max_depth(options.max_depth)
        .parse(&mut decoder.handler());
    let (value, report) = decoder.finish()?;
    *target = value;
    parsed?;
    options.mode.check(report.into_skipped())
}

/// Decode `source` into a fresh `T`, leniently.
pub fn from_str<T: Facet<'static>>(source: &str) -> Result<T> {
    from_str_with(source, &DecodeOptions::default())
}

/// Decode `source` into a fresh `T` with the given options.
///
/// Fields the document does not mention hold their type's default.
pub fn from_str_with<T: Facet<'static>>(source: &str, options: &DecodeOptions) -> Result<T> {
    let mut decoder = Decoder::new(options)?;
    Parser::new(source)
        .max_depth(options.max_depth)
        .parse(&mut decoder.handler())?;
    let (value, report) = decoder.finish()?;
    options.mode.check(report.into_skipped())?;
    Ok(value)
}

/// Decode raw bytes into a fresh `T` with the given options.
///
/// Input that is not UTF-8 is a parse error.
pub fn from_bytes<T: Facet<'static>>(source: &[u8], options: &DecodeOptions) -> Result<T> {
    from_str_with(inn_parse::check_utf8(source)?, options)
}

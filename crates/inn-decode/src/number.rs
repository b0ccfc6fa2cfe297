//! The `MANTISSA<<SHIFT` numeric literal helper.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use facet::Facet;

use crate::scalar::{parse_i64, parse_u64};
use crate::{Decode, DecodeErrorKind};

/// An integer written as `MANTISSA` or `MANTISSA<<SHIFT`.
///
/// Decoding keeps the raw text; [`int64`](Self::int64) and
/// [`uint64`](Self::uint64) evaluate it. Each part follows the usual
/// integer base rules. A part that does not parse counts as zero and one
/// that overflows saturates, so evaluation never fails:
///
/// ```
/// use inn_decode::Number;
///
/// assert_eq!(Number::from("5<<3").int64(), 40);
/// assert_eq!(Number::from("0x10<<4").uint64(), 256);
/// assert_eq!(Number::from("x<<3").int64(), 0);
/// ```
#[derive(Facet, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Number(pub String);

impl Number {
    fn parts(&self) -> (&str, &str) {
        self.0.split_once("<<").unwrap_or((self.0.as_str(), ""))
    }

    /// Shift amount; anything past `u32::MAX` shifts every bit out anyway.
    fn shift(&self) -> u32 {
        let (_, shift) = self.parts();
        match parse_u64(shift, "u64") {
            Ok(shift) => u32::try_from(shift).unwrap_or(u32::MAX),
            Err(DecodeErrorKind::OutOfRange { .. }) => u32::MAX,
            Err(_) => 0,
        }
    }

    /// The value as a signed 64-bit integer.
    pub fn int64(&self) -> i64 {
        let (mantissa, _) = self.parts();
        let mantissa = match parse_i64(mantissa, "i64") {
            Ok(mantissa) => mantissa,
            Err(DecodeErrorKind::OutOfRange { .. }) if mantissa.starts_with('-') => i64::MIN,
            Err(DecodeErrorKind::OutOfRange { .. }) => i64::MAX,
            Err(_) => 0,
        };
        mantissa.checked_shl(self.shift()).unwrap_or(0)
    }

    /// The value as an unsigned 64-bit integer.
    pub fn uint64(&self) -> u64 {
        let (mantissa, _) = self.parts();
        let mantissa = match parse_u64(mantissa, "u64") {
            Ok(mantissa) => mantissa,
            Err(DecodeErrorKind::OutOfRange { .. }) => u64::MAX,
            Err(_) => 0,
        };
        mantissa.checked_shl(self.shift()).unwrap_or(0)
    }

    /// The raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Number {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for Number {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Decode for Number {
    fn decode_text(raw: &str) -> Result<Self, DecodeErrorKind> {
        Ok(Self::from(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;

    #[test]
    fn test_shifted_values() {
        assert_eq!(Number::from("5<<3").int64(), 40);
        assert_eq!(Number::from("5<<3").uint64(), 40);
        assert_eq!(Number::from("7").int64(), 7);
        assert_eq!(Number::from("-1<<4").int64(), -16);
        assert_eq!(Number::from("1<<0x10").uint64(), 65536);
    }

    #[test]
    fn test_malformed_parts_count_as_zero() {
        assert_eq!(Number::from("x<<3").int64(), 0);
        assert_eq!(Number::from("x<<3").uint64(), 0);
        // a bad shift leaves the mantissa alone
        assert_eq!(Number::from("9<<y").int64(), 9);
        assert_eq!(Number::from("").int64(), 0);
        assert_eq!(Number::from("-3").uint64(), 0);
    }

    #[test]
    fn test_wide_shifts_are_zero() {
        assert_eq!(Number::from("1<<63").uint64(), 1 << 63);
        assert_eq!(Number::from("1<<64").uint64(), 0);
        assert_eq!(Number::from("1<<64").int64(), 0);
        assert_eq!(Number::from("3<<4294967296").int64(), 0);
        assert_eq!(Number::from("3<<99999999999999999999").int64(), 0);
        assert_eq!(Number::from("3<<99999999999999999999").uint64(), 0);
    }

    #[test]
    fn test_oversized_mantissa_saturates() {
        assert_eq!(Number::from("99999999999999999999").int64(), i64::MAX);
        assert_eq!(Number::from("99999999999999999999").uint64(), u64::MAX);
        assert_eq!(Number::from("-99999999999999999999").int64(), i64::MIN);
        assert_eq!(Number::from("99999999999999999999<<1").uint64(), u64::MAX << 1);
        assert_eq!(Number::from("0x1_0000_0000_0000_0000<<64").uint64(), 0);
    }

    #[test]
    fn test_decode_keeps_raw_text() {
        let n = Number::decode_text("0x2<<8").unwrap();
        assert_eq!(n.as_str(), "0x2<<8");
        assert_eq!(n.to_string(), "0x2<<8");
        assert_eq!(n.uint64(), 512);
    }
}

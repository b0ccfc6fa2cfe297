//! Leaf conversions from raw text.

use std::any::type_name;
use std::num::IntErrorKind;

use crate::{Decode, DecodeErrorKind};

/// Sign and magnitude of an integer literal.
///
/// Follows the usual base-detection rules: `0x`, `0o` and `0b` prefixes,
/// a leading `0` for octal, and `_` between digits. A sign is only
/// accepted when `signed` is set.
fn parse_magnitude(
    raw: &str,
    signed: bool,
    type_name: &'static str,
) -> Result<(bool, u64), DecodeErrorKind> {
    let invalid = || DecodeErrorKind::InvalidInteger {
        raw: raw.to_string(),
    };

    let (negative, body) = match raw.as_bytes().first() {
        Some(b'-') if signed => (true, &raw[1..]),
        Some(b'+') if signed => (false, &raw[1..]),
        _ => (false, raw),
    };

    let lower = body.to_ascii_lowercase();
    let (radix, digits) = if let Some(rest) = lower.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (2, rest)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower.as_str())
    };

    if body.contains('_') && !underscores_ok(&lower) {
        return Err(invalid());
    }
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(invalid());
    }

    match u64::from_str_radix(&digits, radix) {
        Ok(magnitude) => Ok((negative, magnitude)),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Err(DecodeErrorKind::OutOfRange {
            raw: raw.to_string(),
            type_name,
        }),
        Err(_) => Err(invalid()),
    }
}

/// Underscores may only sit between digits, or right after a base prefix.
fn underscores_ok(lower: &str) -> bool {
    let bytes = lower.as_bytes();
    let mut i = 0;
    let mut hex = false;
    // '^' start, '0' digit, '_' underscore, '!' anything else
    let mut saw = b'^';
    if bytes.len() >= 2 && bytes[0] == b'0' && matches!(bytes[1], b'b' | b'o' | b'x') {
        i = 2;
        saw = b'0';
        hex = bytes[1] == b'x';
    }
    for &b in &bytes[i..] {
        if b.is_ascii_digit() || (hex && (b'a'..=b'f').contains(&b)) {
            saw = b'0';
        } else if b == b'_' {
            if saw != b'0' {
                return false;
            }
            saw = b'_';
        } else {
            if saw == b'_' {
                return false;
            }
            saw = b'!';
        }
    }
    saw != b'_'
}

pub(crate) fn parse_i64(raw: &str, type_name: &'static str) -> Result<i64, DecodeErrorKind> {
    let (negative, magnitude) = parse_magnitude(raw, true, type_name)?;
    let out_of_range = || DecodeErrorKind::OutOfRange {
        raw: raw.to_string(),
        type_name,
    };
    if negative {
        if magnitude > i64::MIN.unsigned_abs() {
            return Err(out_of_range());
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        i64::try_from(magnitude).map_err(|_| out_of_range())
    }
}

pub(crate) fn parse_u64(raw: &str, type_name: &'static str) -> Result<u64, DecodeErrorKind> {
    let (_, magnitude) = parse_magnitude(raw, false, type_name)?;
    Ok(magnitude)
}

macro_rules! decode_int {
    ($parse:ident => $($ty:ty),+) => {
        $(
            impl Decode for $ty {
                fn decode_text(raw: &str) -> Result<Self, DecodeErrorKind> {
                    let wide = $parse(raw, type_name::<$ty>())?;
                    <$ty>::try_from(wide).map_err(|_| DecodeErrorKind::OutOfRange {
                        raw: raw.to_string(),
                        type_name: type_name::<$ty>(),
                    })
                }
            }
        )+
    };
}

decode_int!(parse_i64 => i8, i16, i32, i64, isize);
decode_int!(parse_u64 => u8, u16, u32, u64, usize);

fn parse_float(raw: &str) -> Result<f64, DecodeErrorKind> {
    raw.parse::<f64>()
        .map_err(|_| DecodeErrorKind::InvalidFloat {
            raw: raw.to_string(),
        })
}

impl Decode for f64 {
    fn decode_text(raw: &str) -> Result<Self, DecodeErrorKind> {
        parse_float(raw)
    }
}

impl Decode for f32 {
    fn decode_text(raw: &str) -> Result<Self, DecodeErrorKind> {
        Ok(parse_float(raw)? as f32)
    }
}

impl Decode for bool {
    fn decode_text(raw: &str) -> Result<Self, DecodeErrorKind> {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" => Ok(true),
            "false" | "f" | "no" | "n" => Ok(false),
            _ => Err(DecodeErrorKind::InvalidBool {
                raw: raw.to_string(),
            }),
        }
    }
}

impl Decode for String {
    fn decode_text(raw: &str) -> Result<Self, DecodeErrorKind> {
        Ok(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_testhelpers::test;
    use proptest::prelude::*;

    #[test]
    fn test_integer_bases() {
        assert_eq!(i32::decode_text("0x1F"), Ok(31));
        assert_eq!(i32::decode_text("0X1f"), Ok(31));
        assert_eq!(i32::decode_text("017"), Ok(15));
        assert_eq!(i32::decode_text("0o17"), Ok(15));
        assert_eq!(i32::decode_text("0b101"), Ok(5));
        assert_eq!(i32::decode_text("0"), Ok(0));
        assert_eq!(i32::decode_text("-42"), Ok(-42));
        assert_eq!(i32::decode_text("+42"), Ok(42));
        assert_eq!(u32::decode_text("1_000_000"), Ok(1_000_000));
        assert_eq!(u32::decode_text("0x_ff"), Ok(255));
    }

    #[test]
    fn test_integer_syntax_errors() {
        for raw in ["", "-", "0x", "08", "1__0", "_1", "1_", "12a", "0x+1", "1.5", " 1"] {
            assert_eq!(
                i64::decode_text(raw),
                Err(DecodeErrorKind::InvalidInteger { raw: raw.into() }),
                "{raw:?}"
            );
        }
        // unsigned types take no sign at all
        assert!(matches!(
            u8::decode_text("+1"),
            Err(DecodeErrorKind::InvalidInteger { .. })
        ));
    }

    #[test]
    fn test_integer_range() {
        assert_eq!(i8::decode_text("-128"), Ok(i8::MIN));
        assert_eq!(i64::decode_text("-9223372036854775808"), Ok(i64::MIN));
        assert_eq!(
            i8::decode_text("128"),
            Err(DecodeErrorKind::OutOfRange {
                raw: "128".into(),
                type_name: "i8"
            })
        );
        assert_eq!(
            u64::decode_text("0x1_0000_0000_0000_0000"),
            Err(DecodeErrorKind::OutOfRange {
                raw: "0x1_0000_0000_0000_0000".into(),
                type_name: "u64"
            })
        );
        assert!(matches!(
            i64::decode_text("9223372036854775808"),
            Err(DecodeErrorKind::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_floats() {
        assert_eq!(f64::decode_text("1.5e3"), Ok(1500.0));
        assert_eq!(f32::decode_text("-0.25"), Ok(-0.25));
        assert!(f64::decode_text("inf").unwrap().is_infinite());
        assert_eq!(
            f64::decode_text("1,5"),
            Err(DecodeErrorKind::InvalidFloat { raw: "1,5".into() })
        );
    }

    #[test]
    fn test_bools() {
        for raw in ["true", "T", "Yes", "y"] {
            assert_eq!(bool::decode_text(raw), Ok(true), "{raw}");
        }
        for raw in ["FALSE", "f", "no", "N"] {
            assert_eq!(bool::decode_text(raw), Ok(false), "{raw}");
        }
        assert_eq!(
            bool::decode_text("maybe"),
            Err(DecodeErrorKind::InvalidBool {
                raw: "maybe".into()
            })
        );
    }

    #[test]
    fn test_strings_are_verbatim() {
        assert_eq!(String::decode_text("123"), Ok("123".to_string()));
        assert_eq!(String::decode_text(""), Ok(String::new()));
    }

    proptest! {
        #[test]
        fn prop_i64_decimal_and_hex(n in any::<i64>()) {
            prop_assert_eq!(i64::decode_text(&n.to_string()), Ok(n));
            let hex = if n < 0 {
                format!("-0x{:x}", n.unsigned_abs())
            } else {
                format!("0x{n:x}")
            };
            prop_assert_eq!(i64::decode_text(&hex), Ok(n));
        }

        #[test]
        fn prop_u16_range_checked(n in any::<u32>()) {
            let decoded = u16::decode_text(&n.to_string());
            if n <= u32::from(u16::MAX) {
                prop_assert_eq!(decoded, Ok(n as u16));
            } else {
                prop_assert!(
                    matches!(decoded, Err(DecodeErrorKind::OutOfRange { .. })),
                    "expected an out of range error"
                );
            }
        }
    }
}

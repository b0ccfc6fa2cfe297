//! Backslash escape processing for quoted values.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

/// Unescape the contents of a quoted value (without the surrounding quotes).
///
/// Recognised escapes are `\n \r \t \\ \" \' \0 \a \b \f \v`, `\xHH`,
/// `\u{H..}`, `\uHHHH` and `\UHHHHHHHH`. Anything else is kept as written,
/// backslash included.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some('0') => result.push('\0'),
            Some('a') => result.push('\u{07}'),
            Some('b') => result.push('\u{08}'),
            Some('f') => result.push('\u{0c}'),
            Some('v') => result.push('\u{0b}'),
            Some(kind @ ('x' | 'u' | 'U')) => {
                let decoded = if kind == 'u' && chars.peek() == Some(&'{') {
                    braced_hex(&mut chars)
                } else {
                    let width = match kind {
                        'x' => 2,
                        'u' => 4,
                        _ => 8,
                    };
                    fixed_hex(&mut chars, width)
                };
                match decoded {
                    Ok(ch) => result.push(ch),
                    Err(consumed) => {
                        result.push('\\');
                        result.push(kind);
                        result.push_str(&consumed);
                    }
                }
            }
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    Cow::Owned(result)
}

/// Read exactly `width` hex digits. On failure, returns what was consumed.
fn fixed_hex(chars: &mut Peekable<Chars<'_>>, width: usize) -> Result<char, String> {
    let mut hex = String::with_capacity(width);
    while hex.len() < width {
        match chars.peek() {
            Some(c) if c.is_ascii_hexdigit() => {
                hex.push(*c);
                chars.next();
            }
            _ => return Err(hex),
        }
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(hex)
}

/// Read `{H..}`. On failure, returns what was consumed.
fn braced_hex(chars: &mut Peekable<Chars<'_>>) -> Result<char, String> {
    let mut consumed = String::new();
    // opening brace
    if let Some(c) = chars.next() {
        consumed.push(c);
    }
    let mut hex = String::new();
    loop {
        match chars.peek() {
            Some('}') => {
                chars.next();
                consumed.push('}');
                break;
            }
            Some(c) if c.is_ascii_hexdigit() && hex.len() < 6 => {
                hex.push(*c);
                consumed.push(*c);
                chars.next();
            }
            _ => return Err(consumed),
        }
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(consumed)
}

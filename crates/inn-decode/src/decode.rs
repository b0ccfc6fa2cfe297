//! Decoding single values from text.

use std::fmt;

use facet_core::{Facet, Shape};
use facet_reflect::{Partial, ReflectError};

use crate::{DecodeErrorKind, Number};

/// The value under construction.
pub(crate) type Wip = Partial<'static>;

/// Writes an already decoded value into the frame it is given.
pub(crate) type Setter = Box<dyn FnOnce(Wip) -> Result<Wip, ReflectError>>;

/// A type that can be decoded from the text of one value.
///
/// Implemented for the integer and float types, `bool`, `String` and
/// [`Number`]. Any other type can take part in a decode by implementing it
/// and being registered with
/// [`DecodeOptions::decoder`](crate::DecodeOptions::decoder).
///
/// ```
/// use facet::Facet;
/// use inn_decode::{Decode, DecodeErrorKind, DecodeOptions};
///
/// #[derive(Facet, Debug, PartialEq)]
/// #[repr(u8)]
/// enum Level {
///     Low,
///     High,
/// }
///
/// impl Decode for Level {
///     fn decode_text(raw: &str) -> Result<Self, DecodeErrorKind> {
///         match raw {
///             "low" => Ok(Level::Low),
///             "high" => Ok(Level::High),
///             _ => Err(DecodeErrorKind::Invalid {
///                 raw: raw.to_string(),
///                 type_name: "Level",
///             }),
///         }
///     }
/// }
///
/// #[derive(Facet, Debug)]
/// struct Alarm {
///     level: Option<Level>,
/// }
///
/// let options = DecodeOptions::new().decoder::<Level>();
/// let alarm: Alarm = inn_decode::from_str_with("level: high", &options).unwrap();
/// assert_eq!(alarm.level, Some(Level::High));
/// ```
pub trait Decode: Sized {
    /// Decode `raw`.
    fn decode_text(raw: &str) -> Result<Self, DecodeErrorKind>;
}

/// The text decoder for one type.
#[derive(Clone, Copy)]
pub struct TextDecoder {
    shape: &'static Shape,
    decode: fn(&str) -> Result<Setter, DecodeErrorKind>,
}

impl TextDecoder {
    /// The decoder for `T`.
    pub fn of<T>() -> Self
    where
        T: Decode + Facet<'static> + 'static,
    {
        Self {
            shape: T::SHAPE,
            decode: setter::<T>,
        }
    }

    /// The type this decoder produces.
    pub fn shape(&self) -> &'static Shape {
        self.shape
    }
}

impl fmt::Debug for TextDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextDecoder")
            .field(&self.shape.type_identifier)
            .finish()
    }
}

fn setter<T>(raw: &str) -> Result<Setter, DecodeErrorKind>
where
    T: Decode + Facet<'static> + 'static,
{
    let value = T::decode_text(raw)?;
    Ok(Box::new(move |wip: Wip| wip.set(value)))
}

pub(crate) fn same_type(a: &Shape, b: &Shape) -> bool {
    a.id == b.id
}

macro_rules! builtin {
    ($shape:ident, $raw:ident; $($ty:ty),+ $(,)?) => {
        $(
            if same_type($shape, <$ty as Facet<'static>>::SHAPE) {
                return setter::<$ty>($raw);
            }
        )+
    };
}

/// Decode `raw` as a value of `shape`.
///
/// `custom` decoders are consulted before the built-in ones.
pub(crate) fn decode_text(
    shape: &'static Shape,
    raw: &str,
    custom: &[TextDecoder],
) -> Result<Setter, DecodeErrorKind> {
    if let Some(decoder) = custom.iter().find(|d| same_type(d.shape, shape)) {
        return (decoder.decode)(raw);
    }
    builtin!(shape, raw;
        i8, i16, i32, i64, isize,
        u8, u16, u32, u64, usize,
        f32, f64, bool, String, Number,
    );
    Err(DecodeErrorKind::Unsupported {
        type_name: shape.type_identifier,
    })
}

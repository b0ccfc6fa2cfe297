//! The value under construction, shared by every handler of one decode.

use facet_core::{Def, Shape, Type, UserType};
use facet_reflect::ReflectError;
use tracing::{trace, warn};

use crate::decode::{self, Setter, TextDecoder, Wip};
use crate::schema::Layer;
use crate::{DecodeError, DecodeErrorKind, Error, Report};

/// Owns the [`Wip`] and the report while handlers take turns driving it.
///
/// Every builder operation goes through [`apply`](Self::apply). Bad input
/// never reaches the builder: text is decoded first and only a decoded
/// value is written. An operation that still fails poisons the cursor;
/// later operations do nothing and [`finish`](Self::finish) returns the
/// error.
pub(crate) struct Cursor {
    wip: Option<Wip>,
    /// Frames entered above the root and not yet ended.
    open: usize,
    report: Report,
    failure: Option<Error>,
    decoders: Vec<TextDecoder>,
}

impl Cursor {
    pub(crate) fn new(wip: Wip, decoders: Vec<TextDecoder>) -> Self {
        Self {
            wip: Some(wip),
            open: 0,
            report: Report::new(),
            failure: None,
            decoders,
        }
    }

    pub(crate) fn report(&self) -> &Report {
        &self.report
    }

    /// Record a skipped value.
    pub(crate) fn skip(&mut self, key: &str, kind: DecodeErrorKind) {
        self.report.push(DecodeError::new(key, kind));
    }

    /// Give up on the whole decode.
    pub(crate) fn fail(&mut self, error: Error) {
        warn!(%error, "abandoning decode");
        self.wip = None;
        if self.failure.is_none() {
            self.failure = Some(error);
        }
    }

    /// Run one builder operation. Returns whether it succeeded.
    pub(crate) fn apply(&mut self, op: impl FnOnce(Wip) -> Result<Wip, ReflectError>) -> bool {
        let Some(wip) = self.wip.take() else {
            return false;
        };
        match op(wip) {
            Ok(wip) => {
                self.wip = Some(wip);
                true
            }
            Err(e) => {
                self.fail(Error::Reflect(e.to_string()));
                false
            }
        }
    }

    /// Run an operation that pushes a frame.
    pub(crate) fn enter(&mut self, op: impl FnOnce(Wip) -> Result<Wip, ReflectError>) -> bool {
        let entered = self.apply(op);
        if entered {
            self.open += 1;
        }
        entered
    }

    /// Enter `layers`, allocating each one fresh.
    pub(crate) fn enter_layers(&mut self, layers: &[Layer]) -> bool {
        layers.iter().all(|layer| match layer {
            Layer::Some => self.enter(|wip| wip.begin_some()),
            Layer::Pointer => self.enter(|wip| wip.begin_smart_ptr()),
        })
    }

    /// End the innermost `frames` frames.
    pub(crate) fn leave(&mut self, frames: usize) {
        for _ in 0..frames {
            if self.apply(|wip| wip.end()) {
                self.open -= 1;
            }
        }
    }

    /// Write a decoded value into the current frame.
    pub(crate) fn set(&mut self, setter: Setter) -> bool {
        self.apply(setter)
    }

    /// Decode `raw` as a value of `shape`.
    pub(crate) fn decode(
        &self,
        shape: &'static Shape,
        raw: &str,
    ) -> Result<Setter, DecodeErrorKind> {
        decode::decode_text(shape, raw, &self.decoders)
    }

    /// Initialize the current, fresh frame with default values.
    ///
    /// Structs are filled field by field, so records need no `Default`
    /// impl of their own.
    pub(crate) fn fill_default(&mut self, shape: &'static Shape) {
        match (&shape.def, &shape.ty) {
            (Def::Pointer(ptr), _) => match ptr.pointee {
                Some(pointee) if self.enter(|wip| wip.begin_smart_ptr()) => {
                    self.fill_default(pointee);
                    self.leave(1);
                }
                _ => {
                    self.apply(|wip| wip.set_default());
                }
            },
            (Def::Scalar | Def::Option(_) | Def::List(_) | Def::Map(_), _) => {
                self.apply(|wip| wip.set_default());
            }
            (_, Type::User(UserType::Struct(st))) => {
                trace!(type_name = shape.type_identifier, "filling defaults");
                for (index, field) in st.fields.iter().enumerate() {
                    if self.enter(move |wip| wip.begin_nth_field(index)) {
                        self.fill_default(field.shape());
                        self.leave(1);
                    }
                }
            }
            _ => {
                self.apply(|wip| wip.set_default());
            }
        }
    }

    /// End any frames a failed parse left open, then build the value.
    pub(crate) fn finish(mut self) -> Result<(Wip, Report), Error> {
        let open = self.open;
        self.leave(open);
        match (self.failure, self.wip) {
            (Some(error), _) => Err(error),
            (None, Some(wip)) => Ok((wip, self.report)),
            (None, None) => Err(Error::Reflect("no value under construction".into())),
        }
    }
}

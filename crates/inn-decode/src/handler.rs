//! Content handlers that write into records and maps.

use std::marker::PhantomData;

use facet_core::{Def, Facet, Shape};
use facet_reflect::Partial;
use inn_parse::{ContentHandler, Ignore};
use tracing::{debug, trace};

use crate::cursor::Cursor;
use crate::decode::Setter;
use crate::schema::{Layer, peel};
use crate::{DecodeErrorKind, DecodeOptions, Error, FieldSpec, Kind, Report, Schema, Sigil};

/// The block that caused a handler to be spawned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seed<'w> {
    class: &'w str,
    word: &'w str,
    propagate: bool,
}

impl<'w> Seed<'w> {
    fn new(class: &'w str, word: &'w str) -> Self {
        Self {
            class,
            word,
            propagate: true,
        }
    }

    fn root() -> Self {
        Self {
            class: "",
            word: "",
            propagate: false,
        }
    }

    fn propagate(mut self, propagate: bool) -> Self {
        self.propagate = propagate;
        self
    }

    /// The pair to deliver first, if any.
    fn pair(&self) -> Option<(&'w str, &'w str)> {
        (self.propagate && !self.word.is_empty()).then_some((self.class, self.word))
    }
}

/// What a block decodes into.
enum Target {
    Record(Schema),
    Map {
        key: &'static Shape,
        value: &'static Shape,
    },
}

impl Target {
    /// The target for a value of `shape`, or `None` (reported) if it
    /// cannot hold a block.
    fn of(shape: &'static Shape, cursor: &mut Cursor, class: &str) -> Option<Self> {
        match (&shape.def, Kind::of(shape)) {
            (Def::Map(map), _) => Some(Target::Map {
                key: map.k,
                value: map.v,
            }),
            (_, Kind::Record) => match Schema::of(shape) {
                Ok(schema) => Some(Target::Record(schema)),
                Err(source) => {
                    cursor.fail(Error::Schema {
                        type_name: shape.type_identifier,
                        source,
                    });
                    None
                }
            },
            _ => {
                cursor.skip(
                    class,
                    DecodeErrorKind::NotABlock {
                        type_name: shape.type_identifier,
                    },
                );
                None
            }
        }
    }

    /// Spawn the handler for the current frame. Its block closing ends
    /// `frames` frames.
    fn spawn<'a>(
        self,
        cursor: &'a mut Cursor,
        seed: Seed<'_>,
        frames: usize,
    ) -> Box<dyn ContentHandler + 'a> {
        match self {
            Target::Record(schema) => RecordHandler::spawn(cursor, schema, seed, frames),
            Target::Map { key, value } => MapHandler::spawn(cursor, key, value, seed, frames),
        }
    }
}

/// Handler for a block that decodes into a record.
pub(crate) struct RecordHandler<'a> {
    cursor: &'a mut Cursor,
    schema: Schema,
    frames: usize,
}

impl<'a> RecordHandler<'a> {
    fn spawn(
        cursor: &'a mut Cursor,
        schema: Schema,
        seed: Seed<'_>,
        frames: usize,
    ) -> Box<dyn ContentHandler + 'a> {
        trace!(record = schema.type_name(), class = seed.class, "record opened");
        let mut handler = Self {
            cursor,
            schema,
            frames,
        };
        if let Some((class, word)) = seed.pair() {
            handler.assign(class, word, true);
        }
        Box::new(handler)
    }

    /// Store `value` in the field named `key`.
    ///
    /// Implicit pairs (block seeds) never report unknown fields: most
    /// records have no field named after the block that spawned them.
    fn assign(&mut self, key: &str, value: &str, implicit: bool) {
        let Some(&spec) = self.schema.get(key) else {
            if implicit {
                trace!(key, "no field for block seed");
            } else {
                self.cursor.skip(key, DecodeErrorKind::UnknownField);
            }
            return;
        };
        let result = match spec.sigil {
            Sigil::Scalar => self.set_field(spec, value),
            Sigil::List => self.push_field(spec, value),
            Sigil::Map => {
                debug!(key, "map fields only take blocks, ignoring pair");
                Ok(())
            }
        };
        if let Err(kind) = result {
            self.cursor.skip(key, kind);
        }
    }

    fn set_field(&mut self, spec: FieldSpec, raw: &str) -> Result<(), DecodeErrorKind> {
        let (layers, leaf) = peel(spec.shape);
        let setter = self.cursor.decode(leaf, raw)?;
        let index = spec.index;
        let cursor = &mut *self.cursor;
        if cursor.enter(move |wip| wip.begin_nth_field(index)) && cursor.enter_layers(&layers) {
            cursor.set(setter);
        }
        cursor.leave(1 + layers.len());
        Ok(())
    }

    fn push_field(&mut self, spec: FieldSpec, raw: &str) -> Result<(), DecodeErrorKind> {
        let Def::List(list) = &spec.shape.def else {
            return Err(DecodeErrorKind::SigilMismatch {
                sigil: spec.sigil,
                kind: Kind::of(spec.shape),
            });
        };
        let (layers, leaf) = peel(list.t);
        let setter = self.cursor.decode(leaf, raw)?;
        if self.enter_item(spec.index, &layers) {
            self.cursor.set(setter);
        }
        self.cursor.leave(2 + layers.len());
        Ok(())
    }

    /// Enter a fresh element at the end of list field `index`.
    fn enter_item(&mut self, index: usize, layers: &[Layer]) -> bool {
        let cursor = &mut *self.cursor;
        cursor.enter(move |wip| wip.begin_nth_field(index))
            && cursor.apply(|wip| wip.init_list())
            && cursor.enter(|wip| wip.begin_list_item())
            && cursor.enter_layers(layers)
    }

    fn mismatch(&mut self, spec: FieldSpec) {
        self.cursor.skip(
            spec.name,
            DecodeErrorKind::SigilMismatch {
                sigil: spec.sigil,
                kind: Kind::of(spec.shape),
            },
        );
    }
}

impl ContentHandler for RecordHandler<'_> {
    fn start_element<'s>(
        &'s mut self,
        class: &str,
        word: &str,
    ) -> Option<Box<dyn ContentHandler + 's>> {
        let Some(&spec) = self.schema.get(class) else {
            self.cursor.skip(class, DecodeErrorKind::UnknownBlock);
            return None;
        };
        let seed = Seed::new(class, word).propagate(spec.propagate);
        let index = spec.index;
        match spec.sigil {
            Sigil::Scalar => {
                let (layers, leaf) = peel(spec.shape);
                let target = Target::of(leaf, self.cursor, class)?;
                let cursor = &mut *self.cursor;
                if cursor.enter(move |wip| wip.begin_nth_field(index))
                    && cursor.enter_layers(&layers)
                    && !layers.is_empty()
                {
                    cursor.fill_default(leaf);
                }
                Some(target.spawn(cursor, seed, 1 + layers.len()))
            }
            Sigil::List => {
                let Def::List(list) = &spec.shape.def else {
                    self.mismatch(spec);
                    return None;
                };
                let (layers, leaf) = peel(list.t);
                let target = Target::of(leaf, self.cursor, class)?;
                if self.enter_item(index, &layers) {
                    self.cursor.fill_default(leaf);
                }
                Some(target.spawn(self.cursor, seed, 2 + layers.len()))
            }
            Sigil::Map => {
                let Def::Map(map) = &spec.shape.def else {
                    self.mismatch(spec);
                    return None;
                };
                let key = match self.cursor.decode(map.k, word) {
                    Ok(key) => key,
                    Err(kind) => {
                        self.cursor.skip(class, kind);
                        return None;
                    }
                };
                let (layers, leaf) = peel(map.v);
                let target = Target::of(leaf, self.cursor, class)?;
                let cursor = &mut *self.cursor;
                if cursor.enter(move |wip| wip.begin_nth_field(index))
                    && cursor.apply(|wip| wip.init_map())
                    && enter_value(cursor, key, &layers)
                {
                    cursor.fill_default(leaf);
                }
                Some(target.spawn(cursor, seed, 2 + layers.len()))
            }
        }
    }

    fn end_element(&mut self) {
        self.cursor.leave(self.frames);
    }

    fn key_value_pair(&mut self, key: &str, value: &str) {
        self.assign(key, value, false);
    }
}

/// Insert `key` into the current map and enter a fresh value for it.
fn enter_value(cursor: &mut Cursor, key: Setter, layers: &[Layer]) -> bool {
    if !(cursor.enter(|wip| wip.begin_key()) && cursor.set(key)) {
        return false;
    }
    cursor.leave(1);
    cursor.enter(|wip| wip.begin_value()) && cursor.enter_layers(layers)
}

/// Handler for a block that decodes into a map.
///
/// Pairs insert `key -> value`; nested blocks insert `class -> block`.
pub(crate) struct MapHandler<'a> {
    cursor: &'a mut Cursor,
    key: &'static Shape,
    value: &'static Shape,
    frames: usize,
}

impl<'a> MapHandler<'a> {
    fn spawn(
        cursor: &'a mut Cursor,
        key: &'static Shape,
        value: &'static Shape,
        seed: Seed<'_>,
        frames: usize,
    ) -> Box<dyn ContentHandler + 'a> {
        cursor.apply(|wip| wip.init_map());
        let mut handler = Self {
            cursor,
            key,
            value,
            frames,
        };
        if let Some((class, word)) = seed.pair() {
            handler.key_value_pair(class, word);
        }
        Box::new(handler)
    }

    fn insert(&mut self, key: &str, value: &str) -> Result<(), DecodeErrorKind> {
        let key = self.cursor.decode(self.key, key)?;
        let (layers, leaf) = peel(self.value);
        let value = self.cursor.decode(leaf, value)?;
        if enter_value(self.cursor, key, &layers) {
            self.cursor.set(value);
        }
        self.cursor.leave(1 + layers.len());
        Ok(())
    }
}

impl ContentHandler for MapHandler<'_> {
    fn start_element<'s>(
        &'s mut self,
        class: &str,
        word: &str,
    ) -> Option<Box<dyn ContentHandler + 's>> {
        let key = match self.cursor.decode(self.key, class) {
            Ok(key) => key,
            Err(kind) => {
                self.cursor.skip(class, kind);
                return None;
            }
        };
        let (layers, leaf) = peel(self.value);
        let target = Target::of(leaf, self.cursor, class)?;
        if enter_value(self.cursor, key, &layers) {
            self.cursor.fill_default(leaf);
        }
        Some(target.spawn(self.cursor, Seed::new(class, word), 1 + layers.len()))
    }

    fn end_element(&mut self) {
        self.cursor.leave(self.frames);
    }

    fn key_value_pair(&mut self, key: &str, value: &str) {
        if let Err(kind) = self.insert(key, value) {
            self.cursor.skip(key, kind);
        }
    }
}

/// Decodes one `T` from whatever a parser feeds [`handler`](Self::handler).
///
/// ```
/// use facet::Facet;
/// use inn_decode::{DecodeOptions, Decoder};
///
/// #[derive(Facet, Debug)]
/// struct Limits {
///     conns: u32,
/// }
///
/// let mut decoder = Decoder::<Limits>::new(&DecodeOptions::default()).unwrap();
/// inn_parse::parse("conns: 64\nfiles: 9", &mut decoder.handler()).unwrap();
/// let (limits, report) = decoder.finish().unwrap();
/// assert_eq!(limits.conns, 64);
/// assert_eq!(report.skipped().len(), 1);
/// ```
pub struct Decoder<T> {
    cursor: Cursor,
    marker: PhantomData<fn() -> T>,
}

impl<T: Facet<'static>> Decoder<T> {
    fn alloc(options: &DecodeOptions) -> crate::Result<Self> {
        let wip = Partial::alloc::<T>().map_err(|e| Error::Reflect(e.to_string()))?;
        Ok(Self {
            cursor: Cursor::new(wip, options.decoders.clone()),
            marker: PhantomData,
        })
    }

    /// Start from a value where everything the document does not mention
    /// holds its default.
    pub fn new(options: &DecodeOptions) -> crate::Result<Self> {
        let mut decoder = Self::alloc(options)?;
        decoder.cursor.fill_default(T::SHAPE);
        Ok(decoder)
    }

    /// Start from `value`: only what the document mentions is touched.
    pub fn with_value(value: T, options: &DecodeOptions) -> crate::Result<Self> {
        let mut decoder = Self::alloc(options)?;
        decoder.cursor.apply(|wip| wip.set(value));
        Ok(decoder)
    }

    /// The root handler.
    ///
    /// Targets that cannot hold a block get an [`Ignore`] handler, and the
    /// document is reported as skipped.
    pub fn handler(&mut self) -> Box<dyn ContentHandler + '_> {
        match Target::of(T::SHAPE, &mut self.cursor, "") {
            Some(target) => target.spawn(&mut self.cursor, Seed::root(), 0),
            None => Box::new(Ignore),
        }
    }

    /// Values skipped so far.
    pub fn report(&self) -> &Report {
        self.cursor.report()
    }

    /// Build the value.
    ///
    /// Blocks a failed parse left open are closed as they are.
    pub fn finish(self) -> crate::Result<(T, Report)> {
        let (wip, report) = self.cursor.finish()?;
        let heap = wip.build().map_err(|e| Error::Reflect(e.to_string()))?;
        let value = heap
            .materialize::<T>()
            .map_err(|e| Error::Reflect(e.to_string()))?;
        Ok((value, report))
    }
}

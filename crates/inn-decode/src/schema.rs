//! What the decoder sees of a type: its kind and, for records, its fields.

use std::fmt;

use facet_core::{Def, Field, Shape, StructKind, Type, UserType};

/// How repeated or nested values are merged into a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sigil {
    /// `$`: one value, overwritten by later occurrences.
    #[default]
    Scalar,
    /// `@`: every occurrence appends.
    List,
    /// `%`: every block inserts under its word.
    Map,
}

impl Sigil {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '$' => Some(Sigil::Scalar),
            '@' => Some(Sigil::List),
            '%' => Some(Sigil::Map),
            _ => None,
        }
    }

    /// The annotation character.
    pub fn as_char(self) -> char {
        match self {
            Sigil::Scalar => '$',
            Sigil::List => '@',
            Sigil::Map => '%',
        }
    }
}

impl fmt::Display for Sigil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The structural kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Decoded from text only.
    Scalar,
    /// A struct with named fields.
    Record,
    /// Key-value storage.
    Mapping,
    /// An ordered list.
    Sequence,
    /// `Option` or a smart pointer around another kind.
    Indirect,
}

impl Kind {
    /// Classify `shape`.
    pub fn of(shape: &Shape) -> Self {
        match &shape.def {
            Def::Option(_) | Def::Pointer(_) => Kind::Indirect,
            Def::List(_) => Kind::Sequence,
            Def::Map(_) => Kind::Mapping,
            _ => match &shape.ty {
                Type::User(UserType::Struct(st)) if matches!(st.kind, StructKind::Struct) => {
                    Kind::Record
                }
                _ => Kind::Scalar,
            },
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Scalar => "scalar",
            Kind::Record => "record",
            Kind::Mapping => "mapping",
            Kind::Sequence => "sequence",
            Kind::Indirect => "indirect",
        })
    }
}

/// A wrapper the decoder allocates through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Layer {
    Some,
    Pointer,
}

/// Strip `Option` and smart pointer layers off `shape`, outermost first.
pub(crate) fn peel(mut shape: &'static Shape) -> (Vec<Layer>, &'static Shape) {
    let mut layers = Vec::new();
    loop {
        match &shape.def {
            Def::Option(opt) => {
                layers.push(Layer::Some);
                shape = opt.t;
            }
            Def::Pointer(ptr) => match ptr.pointee {
                Some(pointee) => {
                    layers.push(Layer::Pointer);
                    shape = pointee;
                }
                None => break,
            },
            _ => break,
        }
    }
    (layers, shape)
}

/// One field of a record.
///
/// The field's name in the input, its sigil and its `!` mark come from its
/// facet name, so `#[facet(rename = "@host")]` declares a list of `host`
/// values:
///
/// ```text
/// [$ | @ | %] [NAME] [!]
/// ```
///
/// NAME defaults to the Rust field name.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Position in the struct.
    pub index: usize,
    /// The Rust field name.
    pub ident: &'static str,
    /// The key or block class that addresses the field.
    pub name: &'static str,
    /// Merge behavior.
    pub sigil: Sigil,
    /// Whether a spawning block's own `class: word` is delivered to the child.
    pub propagate: bool,
    /// The field's type.
    pub shape: &'static Shape,
}

impl FieldSpec {
    /// Read the annotation of field `index`.
    pub fn of(index: usize, field: &'static Field) -> Result<Self, SchemaError> {
        let annotation: &'static str = field.effective_name();
        let mut rest = annotation;
        let mut sigil = Sigil::default();
        if let Some(c) = rest.chars().next()
            && let Some(s) = Sigil::from_char(c)
        {
            sigil = s;
            rest = &rest[1..];
        }
        let propagate = match rest.strip_suffix('!') {
            Some(stripped) => {
                rest = stripped;
                false
            }
            None => true,
        };
        if let Some(bad) = rest
            .chars()
            .find(|c| !(c.is_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(SchemaError::BadAnnotation {
                ident: field.name,
                annotation: annotation.to_string(),
                bad,
            });
        }
        Ok(Self {
            index,
            ident: field.name,
            name: if rest.is_empty() { field.name } else { rest },
            sigil,
            propagate,
            shape: field.shape(),
        })
    }
}

/// A struct whose fields cannot be addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The type is not a struct with named fields.
    NotARecord,
    /// The annotation contains a character outside the grammar.
    BadAnnotation {
        /// Field the annotation belongs to.
        ident: &'static str,
        /// The whole annotation.
        annotation: String,
        /// First offending character.
        bad: char,
    },
    /// Two fields share one external name.
    DuplicateName {
        /// The shared name.
        name: &'static str,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::NotARecord => write!(f, "not a struct with named fields"),
            SchemaError::BadAnnotation {
                ident,
                annotation,
                bad,
            } => write!(
                f,
                "field `{ident}`: unexpected {bad:?} in annotation {annotation:?}"
            ),
            SchemaError::DuplicateName { name } => {
                write!(f, "more than one field is named `{name}`")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// The fields of a record type, in declaration order.
#[derive(Debug, Clone)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Read the field annotations of `shape`.
    pub fn of(shape: &'static Shape) -> Result<Self, SchemaError> {
        let st = match &shape.ty {
            Type::User(UserType::Struct(st)) if matches!(st.kind, StructKind::Struct) => st,
            _ => return Err(SchemaError::NotARecord),
        };
        let mut fields: Vec<FieldSpec> = Vec::with_capacity(st.fields.len());
        for (index, field) in st.fields.iter().enumerate() {
            let spec = FieldSpec::of(index, field)?;
            if fields.iter().any(|f| f.name == spec.name) {
                return Err(SchemaError::DuplicateName { name: spec.name });
            }
            fields.push(spec);
        }
        Ok(Self {
            type_name: shape.type_identifier,
            fields,
        })
    }

    /// The record's type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Look a field up by external name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

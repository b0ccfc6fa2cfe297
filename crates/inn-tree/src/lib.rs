#![doc = include_str!("../README.md")]

mod builder;
mod value;
mod writer;

pub use builder::TreeBuilder;
pub use inn_parse::{Location, ParseError, ParseErrorKind, Result};
pub use value::{Block, Node};
pub use writer::{can_be_bare, escape_quoted};

/// Parse an inn document into a tree.
pub fn parse(source: &str) -> Result<Document> {
    Document::parse(source)
}

/// A parsed inn document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Everything at the top level. Class and word are empty.
    pub root: Block,
}

impl Document {
    /// Parse an inn document.
    pub fn parse(source: &str) -> Result<Self> {
        let mut builder = TreeBuilder::new();
        inn_parse::parse(source, &mut builder)?;
        Ok(Document {
            root: builder.finish(),
        })
    }

    /// The value of the last top-level `key` pair.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.root.get(key)
    }

    /// Every top-level value of `key`, in order.
    pub fn get_all<'a>(&'a self, key: &str) -> impl DoubleEndedIterator<Item = &'a str> {
        self.root.get_all(key)
    }

    /// Every top-level `class` block, in order.
    pub fn blocks<'a>(&'a self, class: &str) -> impl DoubleEndedIterator<Item = &'a Block> {
        self.root.blocks(class)
    }
}

impl From<Block> for Document {
    fn from(root: Block) -> Self {
        Self { root }
    }
}

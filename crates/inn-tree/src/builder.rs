//! Tree builder driven by the parser.

use std::mem;

use inn_parse::ContentHandler;
use tracing::trace;

use crate::value::{Block, Node};

/// A handler that records everything it is given as a [`Block`].
///
/// Each nested block gets its own builder, which borrows the parent's node
/// list and appends the finished block to it when the block closes.
#[derive(Debug, Default)]
pub struct TreeBuilder<'p> {
    block: Block,
    parent: Option<&'p mut Vec<Node>>,
}

impl TreeBuilder<'static> {
    /// A builder for a document root.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'p> TreeBuilder<'p> {
    fn child(class: &str, word: &str, parent: &'p mut Vec<Node>) -> Self {
        Self {
            block: Block::new(class, word),
            parent: Some(parent),
        }
    }

    /// The block built so far.
    pub fn finish(self) -> Block {
        self.block
    }
}

impl ContentHandler for TreeBuilder<'_> {
    fn start_element<'s>(
        &'s mut self,
        class: &str,
        word: &str,
    ) -> Option<Box<dyn ContentHandler + 's>> {
        Some(Box::new(TreeBuilder::child(
            class,
            word,
            &mut self.block.nodes,
        )))
    }

    fn end_element(&mut self) {
        if let Some(parent) = self.parent.take() {
            trace!(class = %self.block.class, nodes = self.block.nodes.len(), "block closed");
            parent.push(Node::Block(mem::take(&mut self.block)));
        }
    }

    fn key_value_pair(&mut self, key: &str, value: &str) {
        self.block.nodes.push(Node::pair(key, value));
    }
}

//! Tree types.

/// A block: `class word { ... }`, or the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// Block class. Empty for the root.
    pub class: String,
    /// Block word. Empty for anonymous blocks and the root.
    pub word: String,
    /// Contents in document order.
    pub nodes: Vec<Node>,
}

/// One item inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested block.
    Block(Block),
    /// A `key: value` pair.
    Pair {
        /// The key.
        key: String,
        /// The value, unescaped if it was quoted.
        value: String,
    },
}

impl Node {
    /// Create a pair node.
    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Node::Pair {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Block {
    /// Create an empty block.
    pub fn new(class: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            word: word.into(),
            nodes: Vec::new(),
        }
    }

    /// Append a pair. Returns `self` for chaining.
    pub fn with_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.nodes.push(Node::pair(key, value));
        self
    }

    /// Append a nested block. Returns `self` for chaining.
    pub fn with_block(mut self, block: Block) -> Self {
        self.nodes.push(Node::Block(block));
        self
    }

    /// The value of the last `key` pair directly inside this block.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).next_back()
    }

    /// Every value of `key` directly inside this block, in order.
    pub fn get_all<'a>(&'a self, key: &str) -> impl DoubleEndedIterator<Item = &'a str> {
        self.pairs()
            .filter(move |(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Every `class` block directly inside this block, in order.
    pub fn blocks<'a>(&'a self, class: &str) -> impl DoubleEndedIterator<Item = &'a Block> {
        self.children().filter(move |b| b.class == class)
    }

    /// All pairs directly inside this block.
    pub fn pairs(&self) -> impl DoubleEndedIterator<Item = (&str, &str)> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Pair { key, value } => Some((key.as_str(), value.as_str())),
            Node::Block(_) => None,
        })
    }

    /// All blocks directly inside this block.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Block> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Block(block) => Some(block),
            Node::Pair { .. } => None,
        })
    }

    /// Whether the block has no contents.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

//! Rendering trees back to inn text.

use std::borrow::Cow;
use std::fmt::{self, Write};

use crate::{Block, Document, Node};

const INDENT: &str = "    ";

/// Whether `s` can be written as a bare value.
///
/// A bare value must be non-empty and must not contain whitespace,
/// quotes, braces or `#` (which would start a comment).
pub fn can_be_bare(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| matches!(c, '"' | '\'' | '{' | '}' | '#') || c.is_whitespace())
}

/// Escape `s` for use between double quotes.
pub fn escape_quoted(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| matches!(c, '"' | '\\') || c.is_control()) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn write_text(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    if can_be_bare(text) {
        f.write_str(text)
    } else {
        write!(f, "\"{}\"", escape_quoted(text))
    }
}

fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[Node], depth: usize) -> fmt::Result {
    for node in nodes {
        match node {
            Node::Pair { key, value } => {
                write!(f, "{}{key}: ", INDENT.repeat(depth))?;
                write_text(f, value)?;
                writeln!(f)?;
            }
            Node::Block(block) => write_block(f, block, depth)?,
        }
    }
    Ok(())
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &Block, depth: usize) -> fmt::Result {
    let indent = INDENT.repeat(depth);
    write!(f, "{indent}{}", block.class)?;
    if !block.word.is_empty() {
        f.write_str(" ")?;
        write_text(f, &block.word)?;
    }
    if block.nodes.is_empty() {
        return writeln!(f, " {{ }}");
    }
    writeln!(f, " {{")?;
    write_nodes(f, &block.nodes, depth + 1)?;
    writeln!(f, "{indent}}}")
}

/// Renders the block itself, header and braces included.
///
/// Keys and classes are written as they are; they must be made of word
/// characters and `-` for the output to parse.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, self, 0)
    }
}

/// Renders the root's contents, one item per line.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_nodes(f, &self.root.nodes, 0)
    }
}

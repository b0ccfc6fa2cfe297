//! The callback protocol driven by the parser.

/// Receives the structure of a document as the parser walks it.
///
/// The parser calls [`start_element`](Self::start_element) when a block
/// opens. The returned handler receives everything inside that block,
/// then its [`end_element`](Self::end_element) once the block closes. The
/// root handler gets one final `end_element` when the document ends.
///
/// Returning `None` from `start_element` skips the block: the parser
/// substitutes [`Ignore`] and keeps going.
pub trait ContentHandler {
    /// A block `class word { ... }` opened. `word` is empty for `class { ... }`.
    fn start_element<'s>(
        &'s mut self,
        class: &str,
        word: &str,
    ) -> Option<Box<dyn ContentHandler + 's>> {
        let _ = (class, word);
        None
    }

    /// The block this handler was returned for has closed.
    fn end_element(&mut self) {}

    /// A `key: value` pair inside this handler's block.
    fn key_value_pair(&mut self, key: &str, value: &str) {
        let _ = (key, value);
    }
}

/// The inert handler: ignores everything, including nested blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ignore;

impl ContentHandler for Ignore {}

impl<H: ContentHandler + ?Sized> ContentHandler for &mut H {
    fn start_element<'s>(
        &'s mut self,
        class: &str,
        word: &str,
    ) -> Option<Box<dyn ContentHandler + 's>> {
        (**self).start_element(class, word)
    }

    fn end_element(&mut self) {
        (**self).end_element()
    }

    fn key_value_pair(&mut self, key: &str, value: &str) {
        (**self).key_value_pair(key, value)
    }
}

impl<H: ContentHandler + ?Sized> ContentHandler for Box<H> {
    fn start_element<'s>(
        &'s mut self,
        class: &str,
        word: &str,
    ) -> Option<Box<dyn ContentHandler + 's>> {
        (**self).start_element(class, word)
    }

    fn end_element(&mut self) {
        (**self).end_element()
    }

    fn key_value_pair(&mut self, key: &str, value: &str) {
        (**self).key_value_pair(key, value)
    }
}

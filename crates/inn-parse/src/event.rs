//! Recorded parser callbacks.

use crate::ContentHandler;

/// One callback made by the parser, as recorded by `Vec<Event>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A block was opened. `word` is empty for anonymous blocks.
    StartElement {
        /// Block class (the first token).
        class: String,
        /// Block name (the optional second token), unescaped.
        word: String,
    },
    /// The innermost open block was closed, or the document ended.
    EndElement,
    /// A `key: value` pair inside the current block.
    KeyValuePair {
        /// The key.
        key: String,
        /// The value, unescaped if it was quoted.
        value: String,
    },
}

impl Event {
    /// Shorthand for a [`Event::StartElement`].
    pub fn start(class: &str, word: &str) -> Self {
        Event::StartElement {
            class: class.to_string(),
            word: word.to_string(),
        }
    }

    /// Shorthand for a [`Event::KeyValuePair`].
    pub fn pair(key: &str, value: &str) -> Self {
        Event::KeyValuePair {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Records every callback, nested blocks included, into one flat list.
impl ContentHandler for Vec<Event> {
    fn start_element<'s>(
        &'s mut self,
        class: &str,
        word: &str,
    ) -> Option<Box<dyn ContentHandler + 's>> {
        self.push(Event::start(class, word));
        Some(Box::new(self))
    }

    fn end_element(&mut self) {
        self.push(Event::EndElement);
    }

    fn key_value_pair(&mut self, key: &str, value: &str) {
        self.push(Event::pair(key, value));
    }
}

//! Collection of skipped values during a decode.

use tracing::debug;

use crate::DecodeError;

/// Everything the decoder had to skip, in document order.
///
/// Handlers never fail on bad input: they push here and carry on. The
/// caller decides afterwards whether anything in the report matters (see
/// [`crate::Mode`]).
#[derive(Debug, Default)]
pub struct Report {
    skipped: Vec<DecodeError>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a skipped value.
    pub fn push(&mut self, error: DecodeError) {
        debug!(key = %error.key, reason = %error.kind, "skipping value");
        self.skipped.push(error);
    }

    /// Skipped values so far.
    pub fn skipped(&self) -> &[DecodeError] {
        &self.skipped
    }

    /// Whether nothing was skipped.
    pub fn is_empty(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Take the skipped values.
    pub fn into_skipped(self) -> Vec<DecodeError> {
        self.skipped
    }
}

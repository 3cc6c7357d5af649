use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;

/// Byte range of one message inside its container.
///
/// `offset` points at the first byte of the message's boundary line, as
/// measured during the read pass that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordSpan {
    pub offset: u64,
    pub len: u64,
}

impl RecordSpan {
    pub fn new(offset: u64, len: u64) -> Self {
        Self { offset, len }
    }
}

/// Where to get a record's bytes from when copying it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locator {
    /// A message, copied out of the source container by byte range.
    Span(RecordSpan),
    /// A state line, carried in full (terminator included, if present).
    Line(Vec<u8>),
}

/// A logical record: its fingerprint plus how to find it again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub fingerprint: Fingerprint,
    pub locator: Locator,
}

impl Record {
    pub fn new(fingerprint: Fingerprint, locator: Locator) -> Self {
        Self {
            fingerprint,
            locator,
        }
    }
}

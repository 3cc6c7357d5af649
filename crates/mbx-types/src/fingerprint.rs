use std::fmt;

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// Identity of a logical record, independent of where it is stored.
///
/// Messages are identified by a digest of their normalized content. State
/// lines carry their own dedup key (the tag), which is used verbatim.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Fingerprint {
    /// Content digest of a message.
    Digest(Digest),
    /// Tag token of a state-file line.
    Tag(String),
}

impl Fingerprint {
    /// Build a tag fingerprint.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag(tag.into())
    }
}

impl From<Digest> for Fingerprint {
    fn from(d: Digest) -> Self {
        Self::Digest(d)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digest(d) => write!(f, "Fingerprint({})", d.short_hex()),
            Self::Tag(t) => write!(f, "Fingerprint(tag:{t})"),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digest(d) => write!(f, "{d}"),
            Self::Tag(t) => f.write_str(t),
        }
    }
}

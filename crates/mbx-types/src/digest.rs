use std::fmt;

use serde::{Deserialize, Serialize};

/// A 256-bit BLAKE3 content digest.
///
/// Two messages with the same normalized content always produce the same
/// `Digest`, no matter which container they live in or where.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Wrap a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex characters, for log lines.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.short_hex())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        let d = Digest::from_hash([0xab; 32]);
        assert_eq!(d.to_string(), "ab".repeat(32));
        assert_eq!(d.short_hex(), "abababab");
        assert_eq!(format!("{d:?}"), "Digest(abababab)");
    }

    #[test]
    fn serde_roundtrip() {
        let d = Digest::from_hash([7; 32]);
        let json = serde_json::to_string(&d).unwrap();
        let parsed: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);
    }

    proptest::proptest! {
        #[test]
        fn display_is_full_hex(raw in proptest::prelude::any::<[u8; 32]>()) {
            let d = Digest::from_hash(raw);
            let shown = d.to_string();
            proptest::prop_assert_eq!(shown.len(), 64);
            proptest::prop_assert!(shown.starts_with(&d.short_hex()));
        }
    }
}

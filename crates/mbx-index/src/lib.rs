//! Fingerprint index for mbxsync.
//!
//! Computes a storage-independent fingerprint for every logical record of a
//! container and keeps them in the order they were encountered.
//!
//! # Key Types
//!
//! - [`ContentHasher`] -- Domain-separated BLAKE3 hashing of framed messages
//! - [`FingerprintIndex`] -- Ordered records of one container plus a lookup set
//! - [`PairIndex`] -- Both sides of a matched pair, built before any merge

pub mod error;
pub mod hasher;
pub mod index;

pub use error::{IndexError, IndexResult};
pub use hasher::ContentHasher;
pub use index::{FingerprintIndex, PairIndex};

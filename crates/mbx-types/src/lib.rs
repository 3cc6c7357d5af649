//! Foundation types for mbxsync.
//!
//! Every other mbxsync crate depends on `mbx-types`.
//!
//! # Key Types
//!
//! - [`Digest`] -- BLAKE3 content digest
//! - [`Fingerprint`] -- Storage-independent identity of a logical record
//! - [`Container`] / [`ContainerKind`] -- A mailbox or state file under a profile tree
//! - [`Record`] / [`Locator`] / [`RecordSpan`] -- A fingerprinted record and where its bytes live

pub mod container;
pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod record;

pub use container::{Container, ContainerKind, SIDECAR_EXTENSION, STATE_FILE_NAME};
pub use digest::Digest;
pub use error::TypeError;
pub use fingerprint::Fingerprint;
pub use record::{Locator, Record, RecordSpan};

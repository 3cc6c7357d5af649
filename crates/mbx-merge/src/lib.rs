//! Merge engine for mbxsync.
//!
//! Appends the records each side of a matched pair is missing, picking the
//! copy strategy from the container kind, and drops stale summary caches
//! after messages were added.
//!
//! # Key Types
//!
//! - [`MergeStrategy`] -- Message or state-line copying, chosen per kind
//! - [`Appender`] -- Append-only writer that keeps containers framable
//! - [`PairMerge`] -- Per-direction outcome of merging one pair

pub mod append;
pub mod classify;
pub mod engine;
pub mod error;
pub mod report;
pub mod sidecar;

pub use append::Appender;
pub use classify::MergeStrategy;
pub use engine::{merge_direction, merge_pair, Side};
pub use error::{MergeError, MergeResult};
pub use report::{DirectionReport, PairMerge};
pub use sidecar::invalidate_sidecar;

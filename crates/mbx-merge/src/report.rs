use std::path::PathBuf;

use mbx_types::ContainerKind;
use serde::{Deserialize, Serialize};

/// What one direction of a pair merge did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Records appended to `destination`.
    pub appended: usize,
    /// Malformed source records that were never considered for copying.
    pub skipped: usize,
    /// Whether the destination's summary cache was deleted.
    pub sidecar_removed: bool,
}

/// Both directions of a completed pair merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairMerge {
    pub kind: ContainerKind,
    /// Right-side records appended to the left container.
    pub into_left: DirectionReport,
    /// Left-side records appended to the right container.
    pub into_right: DirectionReport,
}

impl PairMerge {
    pub fn appended(&self) -> usize {
        self.into_left.appended + self.into_right.appended
    }
}

use std::path::PathBuf;

use mbx_merge::PairMerge;
use mbx_types::{Container, ContainerKind};
use serde::{Deserialize, Serialize};

/// How one matched pair ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairOutcome {
    Merged(PairMerge),
    /// The pair was abandoned; other pairs still ran.
    Failed { error: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReport {
    pub relative: PathBuf,
    pub kind: ContainerKind,
    pub left: PathBuf,
    pub right: PathBuf,
    pub outcome: PairOutcome,
}

impl PairReport {
    pub fn merge(&self) -> Option<&PairMerge> {
        match &self.outcome {
            PairOutcome::Merged(merge) => Some(merge),
            PairOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, PairOutcome::Failed { .. })
    }
}

/// Everything a run did, in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub pairs: Vec<PairReport>,
    pub unique_left: Vec<Container>,
    pub unique_right: Vec<Container>,
}

impl SyncReport {
    pub fn any_failed(&self) -> bool {
        self.pairs.iter().any(PairReport::is_failed)
    }

    /// Records appended across all pairs and directions.
    pub fn total_appended(&self) -> usize {
        self.pairs
            .iter()
            .filter_map(PairReport::merge)
            .map(PairMerge::appended)
            .sum()
    }
}

//! The run orchestrator.
//!
//! Pairs are processed one at a time. Each pair gets a fresh
//! [`PairIndex`] that is dropped as soon as the pair is merged, so no
//! state crosses pair boundaries.

use std::path::Path;

use mbx_diff::{match_trees, Correspondence, MatchedPair};
use mbx_index::PairIndex;
use mbx_merge::{merge_pair, PairMerge};
use tracing::{info, warn};

use crate::config::SyncConfig;
use crate::error::SyncResult;
use crate::types::{PairOutcome, PairReport, SyncReport};

pub struct SyncEngine {
    config: SyncConfig,
}

impl SyncEngine {
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Reconcile the profile trees rooted at `left` and `right`.
    ///
    /// Fails only if a tree cannot be walked. A pair that fails is
    /// recorded in the report and the run moves on.
    pub fn run(&self, left: &Path, right: &Path) -> SyncResult<SyncReport> {
        let correspondence = match_trees(left, right)?;
        Ok(self.reconcile(correspondence))
    }

    /// Merge every matched pair of `correspondence` in order.
    pub fn reconcile(&self, correspondence: Correspondence) -> SyncReport {
        if correspondence.is_empty() {
            warn!("no mailboxes found in either profile");
        }
        let mut report = SyncReport::default();
        for pair in &correspondence.matched {
            let outcome = match self.run_pair(pair) {
                Ok(merge) => PairOutcome::Merged(merge),
                Err(e) => {
                    warn!(relative = %pair.relative().display(), error = %e, "pair failed");
                    PairOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.pairs.push(PairReport {
                relative: pair.relative().to_path_buf(),
                kind: pair.kind(),
                left: pair.left.path().to_path_buf(),
                right: pair.right.path().to_path_buf(),
                outcome,
            });
        }

        for container in &correspondence.unique_left {
            info!(path = %container, "only in left profile");
        }
        for container in &correspondence.unique_right {
            info!(path = %container, "only in right profile");
        }
        report.unique_left = correspondence.unique_left;
        report.unique_right = correspondence.unique_right;

        info!(
            pairs = report.pairs.len(),
            appended = report.total_appended(),
            "run complete"
        );
        report
    }

    /// Index, diff and merge one pair.
    pub fn run_pair(&self, pair: &MatchedPair) -> SyncResult<PairMerge> {
        let index = PairIndex::build(&pair.left, &pair.right, self.config.state_header_lines)?;
        Ok(merge_pair(pair, &index)?)
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}

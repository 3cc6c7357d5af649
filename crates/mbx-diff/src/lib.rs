//! Diff engine for mbxsync.
//!
//! Two kinds of comparison drive a reconciliation run:
//!
//! - [`tree_match`] -- pair up containers of two profile trees by relative path
//! - [`record_diff`] -- find the records one side of a pair lacks
//!
//! # Key Types
//!
//! - [`Correspondence`] / [`MatchedPair`] -- Result of matching two trees
//! - [`PairDiff`] -- Missing records in both directions for one pair

pub mod error;
pub mod record_diff;
pub mod tree_match;

pub use error::{DiffError, DiffResult};
pub use record_diff::{diff_pair, missing_in, PairDiff};
pub use tree_match::{match_containers, match_trees, sieve, Correspondence, MatchedPair};

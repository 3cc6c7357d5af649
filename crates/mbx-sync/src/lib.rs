//! Run orchestration for mbxsync.
//!
//! Matches the containers of two profile trees and merges every matched
//! pair in both directions, one pair at a time.
//!
//! # Key Types
//!
//! - [`SyncEngine`] -- Drives a whole run
//! - [`SyncConfig`] -- Run tunables
//! - [`SyncReport`] -- Per-pair outcomes plus the unmatched containers

pub mod config;
pub mod engine;
pub mod error;
pub mod types;

pub use config::SyncConfig;
pub use engine::SyncEngine;
pub use error::{SyncError, SyncResult};
pub use types::{PairOutcome, PairReport, SyncReport};

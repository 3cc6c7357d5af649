//! The per-container fingerprint index.
//!
//! A [`FingerprintIndex`] is built fresh for every matched pair and dropped
//! when the pair is done. Nothing is persisted between runs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use mbx_frame::{frame_mailbox, frame_state_file};
use mbx_types::{Container, ContainerKind, Fingerprint, Locator, Record};
use tracing::debug;

use crate::error::IndexResult;
use crate::hasher::ContentHasher;

/// Fingerprints of one container's records, in encounter order.
#[derive(Clone, Debug)]
pub struct FingerprintIndex {
    path: PathBuf,
    kind: ContainerKind,
    records: Vec<Record>,
    lookup: HashSet<Fingerprint>,
    malformed: usize,
    open_tail: bool,
}

impl FingerprintIndex {
    /// An index over already-fingerprinted records.
    pub fn from_records(path: impl Into<PathBuf>, kind: ContainerKind, records: Vec<Record>) -> Self {
        let lookup = records.iter().map(|r| r.fingerprint.clone()).collect();
        Self {
            path: path.into(),
            kind,
            records,
            lookup,
            malformed: 0,
            open_tail: false,
        }
    }

    /// Frame and fingerprint a container according to its kind.
    pub fn build(container: &Container, state_header_lines: usize) -> IndexResult<Self> {
        match container.kind() {
            ContainerKind::MessageStore => Self::from_message_store(container.path()),
            ContainerKind::StateFile => Self::from_state_file(container.path(), state_header_lines),
        }
    }

    /// Index a message store: one digest per framed message, located by
    /// byte span.
    pub fn from_message_store(path: &Path) -> IndexResult<Self> {
        let hasher = ContentHasher::MESSAGE;
        let mut records = Vec::new();
        let mut open_tail = false;
        frame_mailbox(path, |message| {
            let digest = hasher.hash_message(&message);
            open_tail = message.open_header;
            records.push(Record::new(digest.into(), Locator::Span(message.span)));
        })?;

        debug!(path = %path.display(), records = records.len(), open_tail, "indexed message store");
        let mut index = Self::from_records(path, ContainerKind::MessageStore, records);
        index.open_tail = open_tail;
        Ok(index)
    }

    /// Index a state file: one tag per record line, carrying the raw line.
    pub fn from_state_file(path: &Path, header_lines: usize) -> IndexResult<Self> {
        let state = frame_state_file(path, header_lines)?;
        let records = state
            .lines
            .into_iter()
            .map(|line| Record::new(Fingerprint::tag(line.tag), Locator::Line(line.raw)))
            .collect::<Vec<_>>();

        debug!(path = %path.display(), records = records.len(), "indexed state file");
        let mut index = Self::from_records(path, ContainerKind::StateFile, records);
        index.malformed = state.malformed;
        Ok(index)
    }

    /// The container this index describes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    /// Records in the order they appear in the container.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Whether any record of this container has the fingerprint.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.lookup.contains(fingerprint)
    }

    /// Number of records, duplicates included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record lines skipped while framing (state files only).
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    /// Whether the container's last message has no blank line closing its
    /// headers. Anything appended must close that block first.
    pub fn ends_in_header(&self) -> bool {
        self.open_tail
    }

    /// The distinct fingerprints, for set comparisons.
    pub fn fingerprints(&self) -> &HashSet<Fingerprint> {
        &self.lookup
    }
}

/// Indexes of both sides of a matched pair.
///
/// Both sides are built before anything is appended, so records copied in
/// one direction are never copied back in the other.
#[derive(Clone, Debug)]
pub struct PairIndex {
    pub left: FingerprintIndex,
    pub right: FingerprintIndex,
}

impl PairIndex {
    pub fn build(left: &Container, right: &Container, state_header_lines: usize) -> IndexResult<Self> {
        let left = FingerprintIndex::build(left, state_header_lines)?;
        let right = FingerprintIndex::build(right, state_header_lines)?;
        debug!(
            kind = %left.kind(),
            left = %left.path().display(),
            left_records = left.len(),
            right = %right.path().display(),
            right_records = right.len(),
            "indexed pair"
        );
        Ok(Self { left, right })
    }
}

use mbx_index::{FingerprintIndex, PairIndex};
use mbx_types::Record;

/// Records of `source` whose fingerprint appears nowhere in `destination`,
/// in the source's encounter order.
///
/// Duplicates inside `source` are each reported.
pub fn missing_in<'a>(destination: &FingerprintIndex, source: &'a FingerprintIndex) -> Vec<&'a Record> {
    source
        .records()
        .iter()
        .filter(|record| !destination.contains(&record.fingerprint))
        .collect()
}

/// Missing records in both directions for one matched pair.
#[derive(Clone, Debug)]
pub struct PairDiff<'a> {
    /// Right-side records to append to the left container.
    pub missing_in_left: Vec<&'a Record>,
    /// Left-side records to append to the right container.
    pub missing_in_right: Vec<&'a Record>,
}

impl PairDiff<'_> {
    /// Returns `true` if the two sides already hold the same fingerprints.
    pub fn is_empty(&self) -> bool {
        self.missing_in_left.is_empty() && self.missing_in_right.is_empty()
    }
}

/// Compare both sides of a pair.
pub fn diff_pair(index: &PairIndex) -> PairDiff<'_> {
    PairDiff {
        missing_in_left: missing_in(&index.left, &index.right),
        missing_in_right: missing_in(&index.right, &index.left),
    }
}

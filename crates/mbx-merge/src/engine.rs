//! Append-only union of one matched pair.
//!
//! Both differences are taken from the [`PairIndex`] before the first
//! byte is written. Records go out in the source's encounter order and
//! nothing already in a destination is rewritten.

use mbx_diff::{diff_pair, MatchedPair};
use mbx_index::{FingerprintIndex, PairIndex};
use mbx_types::{Container, Record};
use tracing::{debug, info};

use crate::append::Appender;
use crate::classify::MergeStrategy;
use crate::error::MergeResult;
use crate::report::{DirectionReport, PairMerge};
use crate::sidecar::invalidate_sidecar;

/// One side of a pair: its container and the index built before any
/// append.
#[derive(Clone, Copy, Debug)]
pub struct Side<'a> {
    pub container: &'a Container,
    pub index: &'a FingerprintIndex,
}

impl<'a> Side<'a> {
    pub fn new(container: &'a Container, index: &'a FingerprintIndex) -> Self {
        Self { container, index }
    }
}

/// Append `records` (all from `source`) to `destination`.
///
/// The destination is only opened when there is something to write, and
/// its sidecar is only invalidated after at least one message was added.
pub fn merge_direction(
    strategy: MergeStrategy,
    source: Side<'_>,
    destination: Side<'_>,
    records: &[&Record],
) -> MergeResult<DirectionReport> {
    let mut report = DirectionReport {
        source: source.container.path().to_path_buf(),
        destination: destination.container.path().to_path_buf(),
        appended: 0,
        skipped: source.index.malformed(),
        sidecar_removed: false,
    };
    if records.is_empty() {
        debug!(source = %source.container, destination = %destination.container, "nothing to append");
        return Ok(report);
    }

    let mut appender = Appender::open(destination.container.path())?;
    appender.set_open_header(destination.index.ends_in_header());
    for record in records {
        let bytes = strategy.materialize(source.container.path(), record)?;
        match strategy {
            MergeStrategy::Messages => appender.append_message(&bytes)?,
            MergeStrategy::StateLines => appender.append(&bytes)?,
        }
    }
    report.appended = appender.finish()?;

    if report.appended > 0 && strategy.invalidates_sidecar() {
        report.sidecar_removed = invalidate_sidecar(destination.container);
    }

    info!(
        source = %source.container,
        destination = %destination.container,
        appended = report.appended,
        "merged records"
    );
    Ok(report)
}

/// Merge both directions of `pair` using its prebuilt index.
pub fn merge_pair(pair: &MatchedPair, index: &PairIndex) -> MergeResult<PairMerge> {
    let strategy = MergeStrategy::for_kind(pair.kind());
    let diff = diff_pair(index);
    if diff.is_empty() {
        debug!(relative = %pair.relative().display(), "pair already in sync");
    }
    let left = Side::new(&pair.left, &index.left);
    let right = Side::new(&pair.right, &index.right);

    let into_left = merge_direction(strategy, right, left, &diff.missing_in_left)?;
    let into_right = merge_direction(strategy, left, right, &diff.missing_in_right)?;

    Ok(PairMerge {
        kind: pair.kind(),
        into_left,
        into_right,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use mbx_types::{ContainerKind, Fingerprint};

    struct Fixture {
        _left: tempfile::TempDir,
        _right: tempfile::TempDir,
        pair: MatchedPair,
    }

    fn fixture(name: &str, left: &str, right: &str) -> Fixture {
        let l = tempfile::tempdir().unwrap();
        let r = tempfile::tempdir().unwrap();
        std::fs::write(l.path().join(name), left).unwrap();
        std::fs::write(r.path().join(name), right).unwrap();
        let pair = MatchedPair {
            left: Container::new(l.path(), l.path().join(name)).unwrap(),
            right: Container::new(r.path(), r.path().join(name)).unwrap(),
        };
        Fixture {
            _left: l,
            _right: r,
            pair,
        }
    }

    fn run(fx: &Fixture) -> PairMerge {
        let index = PairIndex::build(&fx.pair.left, &fx.pair.right, 5).unwrap();
        merge_pair(&fx.pair, &index).unwrap()
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    const H1: &str = "From - Mon\nSubject: one\nX-Mozilla-Status: 0001\n\nfirst\n";
    const H2: &str = "From - Tue\nSubject: two\n\nsecond\n";
    const H3: &str = "From - Wed\nSubject: three\nTo: a@example.org\n\nthird\nmore\n";

    #[test]
    fn message_stores_gain_the_other_sides_messages() {
        let left = format!("{H1}{H2}");
        let right = format!("{H2}{H3}");
        let fx = fixture("INBOX", &left, &right);

        let merge = run(&fx);

        assert_eq!(merge.into_left.appended, 1);
        assert_eq!(merge.into_right.appended, 1);
        assert_eq!(read(fx.pair.left.path()), format!("{H1}{H2}{H3}"));
        assert_eq!(read(fx.pair.right.path()), format!("{H2}{H3}{H1}"));
    }

    #[test]
    fn second_merge_appends_nothing() {
        let fx = fixture("INBOX", &format!("{H1}{H2}"), &format!("{H2}{H3}"));
        run(&fx);
        let before = read(fx.pair.left.path());

        let merge = run(&fx);

        assert_eq!(merge.appended(), 0);
        assert_eq!(read(fx.pair.left.path()), before);
    }

    #[test]
    fn existing_bytes_are_preserved() {
        let left = format!("junk before boundary\n{H1}");
        let fx = fixture("INBOX", &left, H3);
        run(&fx);
        assert!(read(fx.pair.left.path()).starts_with(&left));
        assert!(read(fx.pair.right.path()).starts_with(H3));
    }

    #[test]
    fn sidecar_is_removed_only_after_append() {
        let fx = fixture("INBOX", H1, &format!("{H1}{H2}"));
        let left_msf = fx.pair.left.sidecar_path();
        let right_msf = fx.pair.right.sidecar_path();
        std::fs::write(&left_msf, b"cache").unwrap();
        std::fs::write(&right_msf, b"cache").unwrap();

        let merge = run(&fx);

        assert!(merge.into_left.sidecar_removed);
        assert!(!left_msf.exists());
        assert_eq!(merge.into_right.appended, 0);
        assert!(!merge.into_right.sidecar_removed);
        assert!(right_msf.exists());
    }

    #[test]
    fn state_files_exchange_raw_lines() {
        let header = "1\n2\n3\n4\n5\n";
        let left = format!("{header}k t1 10\nk t2 20\n");
        let right = format!("{header}k t2 99\nd t4 40\n");
        let fx = fixture("popstate.dat", &left, &right);

        let merge = run(&fx);

        assert_eq!(merge.kind, ContainerKind::StateFile);
        assert_eq!(read(fx.pair.left.path()), format!("{left}d t4 40\n"));
        assert_eq!(read(fx.pair.right.path()), format!("{right}k t1 10\n"));
        assert!(!merge.into_left.sidecar_removed);
    }

    #[test]
    fn open_header_tails_stay_separate_messages() {
        let cut = "From - a\nSubject: cut\n";
        let fx = fixture("INBOX", cut, H2);

        let first = run(&fx);
        assert_eq!(first.appended(), 2);
        assert_eq!(read(fx.pair.left.path()), format!("{cut}\n{H2}"));
        assert_eq!(read(fx.pair.right.path()), format!("{H2}{cut}"));

        assert_eq!(run(&fx).appended(), 0);
    }

    #[test]
    fn malformed_state_lines_are_reported_not_copied() {
        let header = "1\n2\n3\n4\n5\n";
        let fx = fixture("popstate.dat", &format!("{header}broken\nk t1 1\n"), header);

        let merge = run(&fx);

        assert_eq!(merge.into_right.appended, 1);
        assert_eq!(merge.into_right.skipped, 1);
        assert_eq!(merge.into_left.skipped, 0);
        assert_eq!(read(fx.pair.right.path()), format!("{header}k t1 1\n"));
    }

    #[test]
    fn empty_stores_do_nothing() {
        let fx = fixture("INBOX", "", "no boundary here\n");
        let merge = run(&fx);
        assert_eq!(merge.appended(), 0);
        assert_eq!(read(fx.pair.right.path()), "no boundary here\n");
    }

    #[test]
    fn duplicates_in_source_are_each_appended() {
        let fx = fixture("INBOX", &format!("{H1}{H1}"), "");
        let merge = run(&fx);
        assert_eq!(merge.into_right.appended, 2);
    }

    #[test]
    fn direction_without_records_leaves_destination_alone() {
        let dir = tempfile::tempdir().unwrap();
        let source = Container::new(dir.path(), dir.path().join("A")).unwrap();
        let destination = Container::new(dir.path(), dir.path().join("B")).unwrap();
        let empty = FingerprintIndex::from_records("A", ContainerKind::MessageStore, Vec::new());

        let report = merge_direction(
            MergeStrategy::Messages,
            Side::new(&source, &empty),
            Side::new(&destination, &empty),
            &[],
        )
        .unwrap();
        assert_eq!(report.appended, 0);
        assert!(!destination.path().exists());
    }

    #[test]
    fn appended_messages_fingerprint_like_their_source() {
        let fx = fixture("INBOX", H3, "");
        run(&fx);
        let left = FingerprintIndex::from_message_store(fx.pair.left.path()).unwrap();
        let right = FingerprintIndex::from_message_store(fx.pair.right.path()).unwrap();
        let fp: &Fingerprint = &left.records()[0].fingerprint;
        assert!(right.contains(fp));
    }
}

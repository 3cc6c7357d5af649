//! Tree-level matching: pair up the containers of two profile trees.
//!
//! Only eligible files take part (extensionless mailboxes and the POP
//! state file). Two containers correspond when their paths relative to
//! their tree roots are identical; content is never looked at here.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use mbx_types::{Container, ContainerKind};
use serde::{Deserialize, Serialize};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{DiffError, DiffResult};

/// Two containers with the same relative path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    pub left: Container,
    pub right: Container,
}

impl MatchedPair {
    /// Both sides share a file name, so either side decides the kind.
    pub fn kind(&self) -> ContainerKind {
        self.left.kind()
    }

    pub fn relative(&self) -> &Path {
        self.left.relative()
    }
}

/// The result of matching two trees.
///
/// Every eligible container lands in exactly one of `matched`,
/// `unique_left`, or `unique_right`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correspondence {
    pub matched: Vec<MatchedPair>,
    pub unique_left: Vec<Container>,
    pub unique_right: Vec<Container>,
}

impl Correspondence {
    /// Returns `true` if nothing was found on either side.
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.unique_left.is_empty() && self.unique_right.is_empty()
    }
}

/// Enumerate the eligible containers under `root`, sorted by file name
/// within each directory.
///
/// Eligibility looks only at the file name bytes.
pub fn sieve(root: &Path) -> DiffResult<Vec<Container>> {
    if !root.is_dir() {
        return Err(DiffError::NotADirectory(root.to_path_buf()));
    }

    let mut containers = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| DiffError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        // Symlinks to files count as containers; linked directories are
        // not descended into.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && ContainerKind::is_eligible(entry.file_name()) {
            containers.push(Container::new(root, entry.into_path())?);
        }
    }

    debug!(root = %root.display(), count = containers.len(), "sieved profile tree");
    Ok(containers)
}

/// Pair up two container lists by relative path.
///
/// Matched pairs and `unique_left` follow the order of `left`;
/// `unique_right` keeps the order of `right`.
pub fn match_containers(left: Vec<Container>, right: Vec<Container>) -> Correspondence {
    let mut by_relative: HashMap<PathBuf, usize> = HashMap::with_capacity(right.len());
    for (i, container) in right.iter().enumerate() {
        by_relative.entry(container.relative().to_path_buf()).or_insert(i);
    }
    let mut unclaimed: Vec<Option<Container>> = right.into_iter().map(Some).collect();

    let mut result = Correspondence::default();
    for container in left {
        let claimed = by_relative
            .get(container.relative())
            .and_then(|&i| unclaimed[i].take());
        match claimed {
            Some(right) => result.matched.push(MatchedPair {
                left: container,
                right,
            }),
            None => result.unique_left.push(container),
        }
    }
    result.unique_right = unclaimed.into_iter().flatten().collect();
    result
}

/// Walk both profile trees and match their containers.
pub fn match_trees(left_root: &Path, right_root: &Path) -> DiffResult<Correspondence> {
    let left = sieve(left_root)?;
    let right = sieve(right_root)?;
    let result = match_containers(left, right);

    debug!(
        matched = result.matched.len(),
        unique_left = result.unique_left.len(),
        unique_right = result.unique_right.len(),
        "matched profile trees"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    fn rels(containers: &[Container]) -> Vec<PathBuf> {
        containers.iter().map(|c| c.relative().to_path_buf()).collect()
    }

    #[test]
    fn matches_by_relative_path() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        for rel in ["INBOX", "Sent", "x.msf"] {
            touch(a.path(), rel);
        }
        for rel in ["INBOX", "Drafts"] {
            touch(b.path(), rel);
        }

        let result = match_trees(a.path(), b.path()).unwrap();

        assert_eq!(result.matched.len(), 1);
        assert_eq!(result.matched[0].relative(), Path::new("INBOX"));
        assert_eq!(result.matched[0].left.path(), a.path().join("INBOX"));
        assert_eq!(result.matched[0].right.path(), b.path().join("INBOX"));
        assert_eq!(rels(&result.unique_left), vec![PathBuf::from("Sent")]);
        assert_eq!(rels(&result.unique_right), vec![PathBuf::from("Drafts")]);
    }

    #[test]
    fn nested_mailboxes_and_state_file() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        for root in [a.path(), b.path()] {
            touch(root, "Mail/pop.example.org/popstate.dat");
            touch(root, "Mail/pop.example.org/Inbox");
            touch(root, "Mail/pop.example.org/Inbox.msf");
            touch(root, "Mail/pop.example.org/Archive.sbd/2023");
        }
        touch(a.path(), "prefs.js");

        let result = match_trees(a.path(), b.path()).unwrap();
        let matched: Vec<_> = result
            .matched
            .iter()
            .map(|p| p.relative().to_path_buf())
            .collect();

        assert_eq!(
            matched,
            vec![
                PathBuf::from("Mail/pop.example.org/Archive.sbd/2023"),
                PathBuf::from("Mail/pop.example.org/Inbox"),
                PathBuf::from("Mail/pop.example.org/popstate.dat"),
            ]
        );
        assert_eq!(result.matched[2].kind(), ContainerKind::StateFile);
        assert!(result.unique_left.is_empty());
        assert!(result.unique_right.is_empty());
    }

    #[test]
    fn same_name_in_different_directory_does_not_match() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        touch(a.path(), "one/INBOX");
        touch(b.path(), "two/INBOX");

        let result = match_trees(a.path(), b.path()).unwrap();
        assert!(result.matched.is_empty());
        assert_eq!(result.unique_left.len(), 1);
        assert_eq!(result.unique_right.len(), 1);
    }

    #[test]
    fn every_container_lands_in_exactly_one_bucket() {
        let root_a = Path::new("/a");
        let root_b = Path::new("/b");
        let left: Vec<_> = ["x", "y", "z"]
            .iter()
            .map(|n| Container::new(root_a, root_a.join(n)).unwrap())
            .collect();
        let right: Vec<_> = ["z", "w", "x"]
            .iter()
            .map(|n| Container::new(root_b, root_b.join(n)).unwrap())
            .collect();

        let result = match_containers(left, right);
        assert_eq!(result.matched.len() * 2 + result.unique_left.len() + result.unique_right.len(), 6);
        assert_eq!(rels(&result.unique_left), vec![PathBuf::from("y")]);
        assert_eq!(rels(&result.unique_right), vec![PathBuf::from("w")]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_sieved_by_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let a = tempfile::tempdir().unwrap();
        std::fs::write(a.path().join(OsStr::from_bytes(b"Caf\xe9")), b"").unwrap();
        std::fs::write(a.path().join(OsStr::from_bytes(b"Caf\xe9.msf")), b"").unwrap();

        let found = sieve(a.path()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].relative().as_os_str().as_encoded_bytes(), b"Caf\xe9");
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_mailbox_is_a_container() {
        let a = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();
        touch(elsewhere.path(), "real/INBOX");
        std::os::unix::fs::symlink(elsewhere.path().join("real/INBOX"), a.path().join("INBOX")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path().join("real"), a.path().join("Linked")).unwrap();

        let found = sieve(a.path()).unwrap();
        assert_eq!(rels(&found), vec![PathBuf::from("INBOX")]);
        assert_eq!(found[0].path(), a.path().join("INBOX"));
    }

    #[test]
    fn empty_trees() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        assert!(match_trees(a.path(), b.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let a = tempfile::tempdir().unwrap();
        let result = match_trees(a.path(), &a.path().join("nope"));
        assert!(matches!(result, Err(DiffError::NotADirectory(_))));
    }
}

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// File name of the line-oriented POP state container.
pub const STATE_FILE_NAME: &str = "popstate.dat";

/// Extension of the mail client's per-mailbox summary cache.
pub const SIDECAR_EXTENSION: &str = "msf";

/// The two container formats the reconciler understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerKind {
    /// Concatenated messages separated by `From - ` lines.
    MessageStore,
    /// `popstate.dat`: five header lines followed by tagged records.
    StateFile,
}

impl ContainerKind {
    /// Classify a container by its file name.
    pub fn from_file_name(name: &str) -> Self {
        if name == STATE_FILE_NAME {
            Self::StateFile
        } else {
            Self::MessageStore
        }
    }

    /// Whether a file with this name takes part in reconciliation.
    ///
    /// Extensionless files are mailboxes; anything with a dot (summary
    /// caches, `.sbd` markers, preferences) is skipped, except the state file.
    /// Names need not be valid UTF-8.
    pub fn is_eligible(name: impl AsRef<OsStr>) -> bool {
        let name = name.as_ref().as_encoded_bytes();
        name == STATE_FILE_NAME.as_bytes() || !name.contains(&b'.')
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MessageStore => f.write_str("message store"),
            Self::StateFile => f.write_str("state file"),
        }
    }
}

/// A container file located under a profile tree.
///
/// Identity for matching is `relative`, the path with the tree root
/// stripped.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Container {
    path: PathBuf,
    relative: PathBuf,
}

impl Container {
    /// Locate `path` under `root`.
    pub fn new(root: &Path, path: impl Into<PathBuf>) -> Result<Self, TypeError> {
        let path = path.into();
        let relative = path
            .strip_prefix(root)
            .map_err(|_| TypeError::OutsideRoot {
                path: path.display().to_string(),
                root: root.display().to_string(),
            })?
            .to_path_buf();
        Ok(Self { path, relative })
    }

    /// Full path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path relative to the tree root; the matching key.
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// The container's file name, lossily decoded.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn kind(&self) -> ContainerKind {
        ContainerKind::from_file_name(&self.file_name())
    }

    /// `<container>.msf`, next to the container.
    pub fn sidecar_path(&self) -> PathBuf {
        let mut name: OsString = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(SIDECAR_EXTENSION);
        self.path.with_file_name(name)
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

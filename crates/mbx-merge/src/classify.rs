use std::path::Path;

use mbx_frame::read_span;
use mbx_types::{ContainerKind, Locator, Record};

use crate::error::{MergeError, MergeResult};

/// How records of a container kind are copied between sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Copy whole messages, boundary line included, by byte span.
    Messages,
    /// Copy the raw state line.
    StateLines,
}

impl MergeStrategy {
    pub fn for_kind(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::MessageStore => Self::Messages,
            ContainerKind::StateFile => Self::StateLines,
        }
    }

    pub fn kind(self) -> ContainerKind {
        match self {
            Self::Messages => ContainerKind::MessageStore,
            Self::StateLines => ContainerKind::StateFile,
        }
    }

    /// The bytes to append for `record`, read from `source` when needed.
    pub fn materialize(self, source: &Path, record: &Record) -> MergeResult<Vec<u8>> {
        match (self, &record.locator) {
            (Self::Messages, Locator::Span(span)) => Ok(read_span(source, *span)?),
            (Self::StateLines, Locator::Line(raw)) => Ok(raw.clone()),
            _ => Err(MergeError::LocatorMismatch(self.kind())),
        }
    }

    /// Whether appending under this strategy leaves a stale summary cache.
    pub fn invalidates_sidecar(self) -> bool {
        matches!(self, Self::Messages)
    }
}

use mbx_frame::DEFAULT_HEADER_LINES;
use serde::{Deserialize, Serialize};

/// Tunables for a reconciliation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Opaque header lines at the top of every state file.
    pub state_header_lines: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            state_header_lines: DEFAULT_HEADER_LINES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        assert_eq!(SyncConfig::default().state_header_lines, 5);
    }
}

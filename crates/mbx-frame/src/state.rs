//! Framing for the POP state file (`popstate.dat`).
//!
//! The first few lines are opaque header metadata. Every later non-empty
//! line is one record of space-separated tokens; the second token is the
//! record's tag and serves as its dedup key.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{FrameError, FrameResult};

/// Number of header lines at the top of a state file.
pub const DEFAULT_HEADER_LINES: usize = 5;

/// One record line of a state file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateLine {
    /// Second space-delimited token.
    pub tag: String,
    /// The full line as read, terminator included when present.
    pub raw: Vec<u8>,
    /// Zero-based line number in the file.
    pub line_no: usize,
}

/// A framed state file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateFile {
    pub header: Vec<Vec<u8>>,
    pub lines: Vec<StateLine>,
    /// Record lines skipped because they carry no tag.
    pub malformed: usize,
}

/// Extract the tag of a record line, if it has one.
///
/// Other tokens may hold any bytes, but the tag itself must be UTF-8.
pub fn tag_of(line: &[u8]) -> Option<&str> {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let tag = line.split(|&b| b == b' ').nth(1)?;
    if tag.is_empty() {
        return None;
    }
    std::str::from_utf8(tag).ok()
}

/// Frame a state file read from `reader`, skipping `header_lines` lines.
pub fn parse_state<R: BufRead>(mut reader: R, header_lines: usize) -> std::io::Result<StateFile> {
    let mut state = StateFile::default();
    let mut line_no = 0;

    loop {
        let mut raw = Vec::new();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }

        if line_no < header_lines {
            state.header.push(raw);
        } else if !raw.iter().all(u8::is_ascii_whitespace) {
            match tag_of(&raw).map(str::to_owned) {
                Some(tag) => state.lines.push(StateLine { tag, raw, line_no }),
                None => {
                    let line = String::from_utf8_lossy(&raw);
                    warn!(line_no, line = line.trim_end(), "state line has no usable tag; skipping");
                    state.malformed += 1;
                }
            }
        }
        line_no += 1;
    }

    Ok(state)
}

/// Frame a state file on disk.
pub fn frame_state_file(path: &Path, header_lines: usize) -> FrameResult<StateFile> {
    let file = File::open(path).map_err(|e| FrameError::io(path, e))?;
    let state =
        parse_state(BufReader::new(file), header_lines).map_err(|e| FrameError::io(path, e))?;
    debug!(
        path = %path.display(),
        records = state.lines.len(),
        malformed = state.malformed,
        "framed state file"
    );
    Ok(state)
}

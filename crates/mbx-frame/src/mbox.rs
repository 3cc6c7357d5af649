//! Message framing for mbox-style stores.
//!
//! A store is a run of messages, each introduced by a boundary line that
//! starts (case-insensitively) with `From - `. After the boundary comes a
//! header block ending at the first blank line, then the body up to the
//! next boundary or end of file.
//!
//! The framer works line by line and keeps only the message in progress,
//! so a mailbox of any size is framed in bounded memory.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use mbx_types::RecordSpan;
use tracing::debug;

use crate::error::{FrameError, FrameResult};

/// Prefix of a message boundary line, compared case-insensitively.
pub const BOUNDARY_PREFIX: &[u8] = b"from - ";

/// Header fields that take part in the fingerprint, compared
/// case-insensitively against the start of a header line.
pub const HEADER_WHITELIST: [&[u8]; 4] = [b"subject:", b"from:", b"to:", b"cc:"];

/// One message as seen by the framer.
///
/// `headers` holds only whitelisted header lines and `body` every body
/// line, both with their line terminators removed. The boundary line and
/// all other headers are not part of either.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramedMessage {
    pub span: RecordSpan,
    pub headers: Vec<Vec<u8>>,
    pub body: Vec<Vec<u8>>,
    /// The message ended before a blank line closed its header block.
    /// A boundary written straight after it would be read as a header.
    pub open_header: bool,
}

#[derive(Debug)]
struct Pending {
    offset: u64,
    headers: Vec<Vec<u8>>,
    body: Vec<Vec<u8>>,
}

impl Pending {
    fn at(offset: u64) -> Self {
        Self {
            offset,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    fn finish(self, end: u64, open_header: bool) -> FramedMessage {
        FramedMessage {
            span: RecordSpan::new(self.offset, end - self.offset),
            headers: self.headers,
            body: self.body,
            open_header,
        }
    }
}

#[derive(Debug)]
enum State {
    /// Before the first boundary; nothing here belongs to a message.
    Preamble,
    /// Between a boundary and the first blank line.
    Header(Pending),
    /// After the header block, until the next boundary.
    Body(Pending),
}

/// Incremental boundary state machine.
#[derive(Debug)]
pub struct MessageFramer {
    state: State,
    offset: u64,
}

impl Default for MessageFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageFramer {
    pub fn new() -> Self {
        Self {
            state: State::Preamble,
            offset: 0,
        }
    }

    /// Feed one raw line, terminator included.
    ///
    /// Returns the previous message when `line` opens a new one.
    pub fn push_line(&mut self, line: &[u8]) -> Option<FramedMessage> {
        let start = self.offset;
        self.offset += line.len() as u64;

        let (next, done) = match std::mem::replace(&mut self.state, State::Preamble) {
            State::Preamble if is_boundary(line) => (State::Header(Pending::at(start)), None),
            State::Preamble => (State::Preamble, None),
            State::Header(pending) if is_blank(line) => (State::Body(pending), None),
            State::Header(mut pending) => {
                if is_whitelisted(line) {
                    pending.headers.push(strip_terminator(line).to_vec());
                }
                (State::Header(pending), None)
            }
            State::Body(pending) if is_boundary(line) => (
                State::Header(Pending::at(start)),
                Some(pending.finish(start, false)),
            ),
            State::Body(mut pending) => {
                pending.body.push(strip_terminator(line).to_vec());
                (State::Body(pending), None)
            }
        };

        self.state = next;
        done
    }

    /// Finalize the message in progress, if any.
    pub fn finish(self) -> Option<FramedMessage> {
        match self.state {
            State::Preamble => None,
            State::Header(pending) => Some(pending.finish(self.offset, true)),
            State::Body(pending) => Some(pending.finish(self.offset, false)),
        }
    }
}

/// Frame every message read from `reader`, handing each to `sink` in
/// container order. Returns the number of messages framed.
pub fn frame_messages<R, F>(mut reader: R, mut sink: F) -> std::io::Result<usize>
where
    R: BufRead,
    F: FnMut(FramedMessage),
{
    let mut framer = MessageFramer::new();
    let mut line = Vec::new();
    let mut count = 0;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if let Some(message) = framer.push_line(&line) {
            sink(message);
            count += 1;
        }
    }

    if let Some(message) = framer.finish() {
        sink(message);
        count += 1;
    }
    Ok(count)
}

/// Frame a message store on disk.
pub fn frame_mailbox<F>(path: &Path, sink: F) -> FrameResult<usize>
where
    F: FnMut(FramedMessage),
{
    let file = File::open(path).map_err(|e| FrameError::io(path, e))?;
    let count = frame_messages(BufReader::new(file), sink).map_err(|e| FrameError::io(path, e))?;
    debug!(path = %path.display(), count, "framed message store");
    Ok(count)
}

/// Whether `data` leaves its last message inside an unclosed header block.
pub fn ends_in_header(data: &[u8]) -> bool {
    let mut framer = MessageFramer::new();
    for line in data.split_inclusive(|&b| b == b'\n') {
        framer.push_line(line);
    }
    framer.finish().is_some_and(|m| m.open_header)
}

/// Whether `line` starts a new message.
pub fn is_boundary(line: &[u8]) -> bool {
    line.len() >= BOUNDARY_PREFIX.len()
        && line[..BOUNDARY_PREFIX.len()].eq_ignore_ascii_case(BOUNDARY_PREFIX)
}

fn is_whitelisted(line: &[u8]) -> bool {
    HEADER_WHITELIST
        .iter()
        .any(|field| line.len() >= field.len() && line[..field.len()].eq_ignore_ascii_case(field))
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

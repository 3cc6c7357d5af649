use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use mbx_types::RecordSpan;

use crate::error::{FrameError, FrameResult};

/// Read the exact bytes of a framed record from its container.
///
/// The span must come from a framing pass over the same container; bytes
/// appended since then do not move it.
pub fn read_span(path: &Path, span: RecordSpan) -> FrameResult<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| FrameError::io(path, e))?;
    file.seek(SeekFrom::Start(span.offset))
        .map_err(|e| FrameError::io(path, e))?;

    let mut buf = Vec::with_capacity(span.len as usize);
    file.take(span.len)
        .read_to_end(&mut buf)
        .map_err(|e| FrameError::io(path, e))?;

    if buf.len() as u64 != span.len {
        return Err(FrameError::ShortRead {
            path: path.to_path_buf(),
            offset: span.offset,
            expected: span.len,
            actual: buf.len() as u64,
        });
    }
    Ok(buf)
}

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use mbx_frame::ends_in_header;
use tracing::debug;

use crate::error::{MergeError, MergeResult};

/// Append-only writer for one destination container.
///
/// Existing bytes are never touched. Every appended record starts on a
/// fresh line and ends with `\n`, and a message never follows a header
/// block that is still open, so the container stays framable.
pub struct Appender {
    path: PathBuf,
    writer: BufWriter<File>,
    at_line_start: bool,
    open_header: bool,
    written: u64,
    records: usize,
}

impl Appender {
    /// Open `path` for appending.
    pub fn open(path: &Path) -> MergeResult<Self> {
        let err = |source: io::Error| MergeError::Append {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(path)
            .map_err(err)?;

        let len = file.metadata().map_err(err)?.len();
        let at_line_start = if len == 0 {
            true
        } else {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1)).map_err(err)?;
            file.read_exact(&mut last).map_err(err)?;
            last[0] == b'\n'
        };

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            at_line_start,
            open_header: false,
            written: 0,
            records: 0,
        })
    }

    /// Append one record's bytes.
    pub fn append(&mut self, record: &[u8]) -> MergeResult<()> {
        if record.is_empty() {
            return Ok(());
        }
        if !self.at_line_start {
            self.write(b"\n")?;
        }
        self.write(record)?;
        if !record.ends_with(b"\n") {
            self.write(b"\n")?;
        }
        self.at_line_start = true;
        self.records += 1;
        Ok(())
    }

    /// Declare that the destination's last message has no blank line after
    /// its headers.
    pub fn set_open_header(&mut self, open: bool) {
        self.open_header = open;
    }

    /// Append one message, first closing a header block left open by the
    /// destination or by the previous message.
    pub fn append_message(&mut self, message: &[u8]) -> MergeResult<()> {
        if message.is_empty() {
            return Ok(());
        }
        if self.open_header {
            if !self.at_line_start {
                self.write(b"\n")?;
            }
            self.write(b"\n")?;
            self.at_line_start = true;
        }
        self.append(message)?;
        self.open_header = ends_in_header(message);
        Ok(())
    }

    /// Flush and sync, returning the number of records appended.
    pub fn finish(mut self) -> MergeResult<usize> {
        self.writer
            .flush()
            .and_then(|()| self.writer.get_ref().sync_all())
            .map_err(|source| MergeError::Append {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), records = self.records, bytes = self.written, "append finished");
        Ok(self.records)
    }

    fn write(&mut self, bytes: &[u8]) -> MergeResult<()> {
        self.writer
            .write_all(bytes)
            .map_err(|source| MergeError::Append {
                path: self.path.clone(),
                source,
            })?;
        self.written += bytes.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appended(initial: &str, records: &[&str]) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("INBOX");
        std::fs::write(&path, initial).unwrap();

        let mut appender = Appender::open(&path).unwrap();
        for r in records {
            appender.append(r.as_bytes()).unwrap();
        }
        assert_eq!(appender.finish().unwrap(), records.iter().filter(|r| !r.is_empty()).count());
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn appends_after_existing_bytes() {
        assert_eq!(appended("a\n", &["b\n", "c\n"]), "a\nb\nc\n");
    }

    #[test]
    fn separates_from_unterminated_tail() {
        assert_eq!(appended("a", &["b\n"]), "a\nb\n");
    }

    #[test]
    fn terminates_unterminated_record() {
        assert_eq!(appended("", &["x", "y\n"]), "x\ny\n");
    }

    #[test]
    fn empty_record_is_ignored() {
        assert_eq!(appended("a\n", &[""]), "a\n");
    }

    fn appended_messages(initial: &str, open_header: bool, messages: &[&str]) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("INBOX");
        std::fs::write(&path, initial).unwrap();

        let mut appender = Appender::open(&path).unwrap();
        appender.set_open_header(open_header);
        for m in messages {
            appender.append_message(m.as_bytes()).unwrap();
        }
        appender.finish().unwrap();
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn open_destination_header_is_closed_first() {
        assert_eq!(
            appended_messages("From - a\nSubject: cut\n", true, &["From - b\n\nx\n"]),
            "From - a\nSubject: cut\n\nFrom - b\n\nx\n"
        );
        assert_eq!(
            appended_messages("From - a\nSubject: cut", true, &["From - b\n\nx\n"]),
            "From - a\nSubject: cut\n\nFrom - b\n\nx\n"
        );
    }

    #[test]
    fn header_only_message_is_closed_before_the_next() {
        assert_eq!(
            appended_messages("", false, &["From - a\nSubject: cut\n", "From - b\n\nx\n"]),
            "From - a\nSubject: cut\n\nFrom - b\n\nx\n"
        );
    }

    #[test]
    fn closed_headers_get_no_extra_line() {
        assert_eq!(
            appended_messages("From - a\n\nbody\n", false, &["From - b\n\nx\n"]),
            "From - a\n\nbody\nFrom - b\n\nx\n"
        );
    }

    #[test]
    fn missing_destination_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Appender::open(&dir.path().join("gone"));
        assert!(matches!(result, Err(MergeError::Append { .. })));
    }
}

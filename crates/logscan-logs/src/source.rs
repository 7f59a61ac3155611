use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use logscan_types::LogLine;

use crate::error::{LogError, Result};

/// Lazy sequence of trimmed lines read from a file or any buffered reader.
///
/// The reader is owned by the source, so the underlying file is closed as soon
/// as the source is dropped, whether it was exhausted or abandoned early.
/// Sources are single-pass; open a new one for every scan.
pub struct LineSource<R = BufReader<File>> {
    reader: R,

    /// Reused read buffer
    buf: String,

    /// Number of lines handed out so far
    lines_read: u64,

    /// Set after EOF or a read error
    finished: bool,
}

impl LineSource<BufReader<File>> {
    /// Open a log file for reading
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LogError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "opened log file");
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> LineSource<R> {
    /// Wrap an already-buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            lines_read: 0,
            finished: false,
        }
    }

    /// Number of lines yielded so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<LogLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.buf.clear();
        match self.reader.read_line(&mut self.buf) {
            Ok(0) => {
                self.finished = true;
                tracing::trace!(lines = self.lines_read, "reached end of log");
                None
            }
            Ok(_) => {
                self.lines_read += 1;
                Some(Ok(LogLine::new(self.lines_read, self.buf.trim().to_string())))
            }
            Err(source) => {
                self.finished = true;
                Some(Err(LogError::Read {
                    line_number: self.lines_read + 1,
                    source,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn test_lines_are_trimmed_and_numbered() {
        let data = "  a,INFO,x  \r\nb,ERROR,y\n\n\tc,WARN,z";
        let lines: Vec<LogLine> = LineSource::from_reader(Cursor::new(data))
            .collect::<Result<_>>()
            .unwrap();

        let raw: Vec<&str> = lines.iter().map(|l| l.raw.as_str()).collect();
        assert_eq!(raw, vec!["a,INFO,x", "b,ERROR,y", "", "c,WARN,z"]);
        assert_eq!(lines[3].line_number, 4);
    }

    #[test]
    fn test_open_reads_file_in_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1,INFO,first").unwrap();
        writeln!(file, "2,ERROR,second").unwrap();

        let mut source = LineSource::open(file.path()).unwrap();
        assert_eq!(source.next().unwrap().unwrap().raw, "1,INFO,first");
        assert_eq!(source.lines_read(), 1);
        assert_eq!(source.next().unwrap().unwrap().raw, "2,ERROR,second");
        assert!(source.next().is_none());
        assert!(source.next().is_none());
    }

    #[test]
    fn test_missing_file_is_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = LineSource::open(dir.path().join("missing.log"));
        assert!(matches!(result, Err(LogError::FileAccess { .. })));
    }

    #[test]
    fn test_invalid_utf8_surfaces_read_error() {
        let data: &[u8] = b"ok,INFO,x\n\xff\xfe,ERROR\n";
        let mut source = LineSource::from_reader(Cursor::new(data));
        assert!(source.next().unwrap().is_ok());
        assert!(matches!(
            source.next(),
            Some(Err(LogError::Read { line_number: 2, .. }))
        ));
        assert!(source.next().is_none());
    }
}

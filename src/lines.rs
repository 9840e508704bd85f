//! Line-oriented file I/O shared by the extractor, merger and reporter.
//!
//! Lines are raw bytes: properties files are often Latin-1 or GBK, and every
//! byte that is not a line terminator is carried through unchanged. Reading
//! strips the `\n` terminator and one trailing `\r`, and enforces a per-line
//! byte limit. Writing terminates every line with `\n` and replaces the
//! target atomically through a temporary file in the same directory.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::PropkeepError;
use crate::types::Line;

/// Read buffer size used for every file the tool touches.
pub const BUFFER_SIZE: usize = 64 * 1024;

/// Iterator over the lines of a reader, with 1-based numbering.
pub struct LineReader<R> {
    reader: R,
    path: PathBuf,
    limit: usize,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R, path: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            reader,
            path: path.into(),
            limit,
            line: 0,
        }
    }

    fn read_next(&mut self) -> Result<Option<(usize, Line)>, PropkeepError> {
        let mut buf = Vec::new();
        // Room for the content plus "\r\n"; anything longer cannot be a valid line.
        let cap = (self.limit as u64).saturating_add(2);
        let n = self
            .reader
            .by_ref()
            .take(cap)
            .read_until(b'\n', &mut buf)
            .map_err(|e| PropkeepError::io(&self.path, e))?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;

        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        if buf.len() > self.limit {
            return Err(PropkeepError::LineTooLong {
                path: self.path.clone(),
                line: self.line,
                limit: self.limit,
            });
        }
        Ok(Some((self.line, buf)))
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<(usize, Line), PropkeepError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

/// Open `path` for numbered line reading.
pub fn open_lines(
    path: &Path,
    limit: usize,
) -> Result<LineReader<BufReader<File>>, PropkeepError> {
    let file = File::open(path).map_err(|e| PropkeepError::io(path, e))?;
    Ok(LineReader::new(
        BufReader::with_capacity(BUFFER_SIZE, file),
        path,
        limit,
    ))
}

/// Read every line of `path` into memory.
pub fn read_lines(path: &Path, limit: usize) -> Result<Vec<Line>, PropkeepError> {
    let lines = open_lines(path, limit)?
        .map(|item| item.map(|(_, text)| text))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(path = %path.display(), count = lines.len(), "read file");
    Ok(lines)
}

/// Replace `path` with `lines`, each terminated by `\n`.
///
/// Symlinks are followed: the file they point to is replaced and the link
/// itself stays in place. The content is written to a temporary file next to
/// that target, synced, and renamed over it. Permissions of an existing
/// target are kept.
pub fn write_lines_atomic(path: &Path, lines: &[Line]) -> Result<(), PropkeepError> {
    let target = match std::fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(PropkeepError::io(path, e)),
    };
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let tmp = NamedTempFile::new_in(&parent).map_err(|e| PropkeepError::io(&parent, e))?;
    let tmp_path = tmp.path().to_path_buf();

    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, tmp);
    for line in lines {
        writer
            .write_all(line)
            .and_then(|()| writer.write_all(b"\n"))
            .map_err(|e| PropkeepError::io(&tmp_path, e))?;
    }
    let tmp = writer
        .into_inner()
        .map_err(|e| PropkeepError::io(&tmp_path, e.into_error()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| PropkeepError::io(&tmp_path, e))?;

    if let Ok(meta) = std::fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| PropkeepError::io(&tmp_path, e))?;
    }

    tmp.persist(&target)
        .map_err(|e| PropkeepError::io(&target, e.error))?;
    tracing::debug!(path = %target.display(), count = lines.len(), "wrote file");
    Ok(())
}

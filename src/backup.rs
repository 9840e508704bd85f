//! Timestamped backups of both input files, taken before anything is modified.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::error::PropkeepError;
use crate::lines::BUFFER_SIZE;
use crate::types::BackupPaths;

/// `YYYYMMDDHHMMSS` in local time.
pub fn timestamp() -> String {
    Local::now().format("%Y%m%d%H%M%S").to_string()
}

/// Backup file name for `path`: `<basename><suffix>.<timestamp>`.
fn backup_name(path: &Path, suffix: &str, ts: &str) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_string());
    format!("{base}{suffix}.{ts}")
}

/// Copy `src` to `dst` byte for byte.
pub fn backup_file(src: &Path, dst: &Path) -> Result<u64, PropkeepError> {
    let input = File::open(src).map_err(|e| PropkeepError::io(src, e))?;
    let output = File::create(dst).map_err(|e| PropkeepError::io(dst, e))?;

    let mut reader = BufReader::with_capacity(BUFFER_SIZE, input);
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, output);
    let copied = std::io::copy(&mut reader, &mut writer).map_err(|e| PropkeepError::io(dst, e))?;
    writer.flush().map_err(|e| PropkeepError::io(dst, e))?;

    tracing::debug!(src = %src.display(), dst = %dst.display(), bytes = copied, "backup written");
    Ok(copied)
}

/// Back up both inputs into `dir` (created if missing).
///
/// The old file becomes `<name>.bak.<ts>`, the new file `<name>.new.bak.<ts>`.
pub fn backup_inputs(
    old: &Path,
    new: &Path,
    dir: &Path,
    ts: &str,
) -> Result<BackupPaths, PropkeepError> {
    std::fs::create_dir_all(dir).map_err(|e| PropkeepError::io(dir, e))?;

    let paths = BackupPaths {
        old: dir.join(backup_name(old, ".bak", ts)),
        new: dir.join(backup_name(new, ".new.bak", ts)),
    };
    backup_file(old, &paths.old)?;
    backup_file(new, &paths.new)?;
    Ok(paths)
}

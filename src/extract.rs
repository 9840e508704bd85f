//! Keep-Set extraction: collect the old file's lines that match the key pattern.

use std::path::Path;

use regex::bytes::Regex;

use crate::error::PropkeepError;
use crate::lines;
use crate::pattern;
use crate::settings::Settings;
use crate::types::{KeepSet, Line};

/// Pure function: keep every numbered line that `re` matches.
///
/// Matching runs on the whole line; the pattern decides whether it anchors.
pub fn keep_matching<I>(numbered: I, re: &Regex) -> Result<KeepSet, PropkeepError>
where
    I: IntoIterator<Item = Result<(usize, Line), PropkeepError>>,
{
    let mut keep = KeepSet::new();
    for item in numbered {
        let (line_no, text) = item?;
        if re.is_match(&text) {
            tracing::debug!(line = line_no, text = %String::from_utf8_lossy(&text), "keeping line");
            keep.insert(line_no, text);
        }
    }
    Ok(keep)
}

/// Scan `path` and return the lines matching `pattern`, keyed by line number.
pub fn extract_keep_lines(
    path: &Path,
    pattern: &str,
    settings: &Settings,
) -> Result<KeepSet, PropkeepError> {
    let reader = lines::open_lines(path, settings.max_line_bytes)?;
    let re = pattern::compile_pattern(pattern)?;

    tracing::debug!(path = %path.display(), pattern, "scanning old file");
    let keep = keep_matching(reader, &re)?;
    tracing::debug!(count = keep.len(), "lines to preserve");
    Ok(keep)
}

//! Apply a Keep-Set to the new file's lines.
//!
//! Entries are applied in ascending old-line order. For each one:
//!
//! 1. The key is everything before the first `=` (not trimmed).
//! 2. The first line matching `^\s*<key>\s*=` is replaced with the old line.
//! 3. Otherwise the old line is inserted at its old position if that position
//!    still exists, or appended.
//!
//! Each step sees the effect of the previous ones, so insertions shift the
//! positions later entries are compared against.

use std::path::Path;

use regex::bytes::Regex;

use crate::error::PropkeepError;
use crate::lines;
use crate::settings::Settings;
use crate::types::{KeepSet, KeyLookup, Line, MergeAction};

/// The key part of a `key=value` line. Lines without `=` are their own key.
pub fn line_key(line: &[u8]) -> &[u8] {
    line.iter()
        .position(|&b| b == b'=')
        .map_or(line, |eq| &line[..eq])
}

/// Build the lookup regex for `key`.
///
/// Non-ASCII key bytes are matched as raw bytes, so keys in any encoding
/// find themselves.
fn key_regex(key: &[u8]) -> Result<Regex, regex::Error> {
    let mut escaped = String::with_capacity(key.len());
    for &b in key {
        if b.is_ascii() {
            escaped.push_str(&regex::escape(char::from(b).encode_utf8(&mut [0; 4])));
        } else {
            escaped.push_str(&format!(r"\x{b:02X}"));
        }
    }
    Regex::new(&format!(r"(?-u)^\s*{escaped}\s*="))
}

/// Find the index of the first line assigning `key`.
pub fn find_key(lines: &[Line], key: &[u8]) -> Result<Option<usize>, regex::Error> {
    if lines.is_empty() {
        return Ok(None);
    }
    let re = key_regex(key)?;
    Ok(lines.iter().position(|line| re.is_match(line)))
}

/// Pure function: merge `keep` into `lines` in place.
pub fn merge_lines(
    lines: &mut Vec<Line>,
    keep: &KeepSet,
    mode: KeyLookup,
) -> Result<Vec<MergeAction>, PropkeepError> {
    let mut actions = Vec::with_capacity(keep.len());

    for (&old_line_no, old_line) in keep {
        let key = line_key(old_line);
        let key_text = String::from_utf8_lossy(key).into_owned();
        let found = match find_key(lines, key) {
            Ok(found) => found,
            Err(e) => match mode {
                KeyLookup::Strict => {
                    return Err(PropkeepError::KeyPattern {
                        key: key_text,
                        source: e,
                    });
                }
                KeyLookup::Lenient => {
                    tracing::warn!(key = %key_text, error = %e, "could not build key lookup, treating key as absent");
                    None
                }
            },
        };

        let action = match found {
            Some(index) => {
                lines[index] = old_line.clone();
                MergeAction::Replaced {
                    key: key_text,
                    index,
                }
            }
            None if old_line_no <= lines.len() => {
                let index = old_line_no - 1;
                lines.insert(index, old_line.clone());
                MergeAction::Inserted {
                    key: key_text,
                    index,
                }
            }
            None => {
                lines.push(old_line.clone());
                MergeAction::Appended {
                    key: key_text,
                    index: lines.len() - 1,
                }
            }
        };
        tracing::debug!(?action, "applied preserved line");
        actions.push(action);
    }

    Ok(actions)
}

/// Read `path`, merge `keep` into it, and atomically write it back.
pub fn merge_file(
    path: &Path,
    keep: &KeepSet,
    settings: &Settings,
) -> Result<Vec<MergeAction>, PropkeepError> {
    let mut lines = lines::read_lines(path, settings.max_line_bytes)?;
    tracing::debug!(path = %path.display(), lines = lines.len(), "merging into new file");

    let actions = merge_lines(&mut lines, keep, settings.key_lookup)?;
    lines::write_lines_atomic(path, &lines)?;

    tracing::debug!(preserved = actions.len(), "merge complete");
    Ok(actions)
}

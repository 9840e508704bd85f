use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One line of a properties file, terminator stripped. Bytes are kept as
/// read so that non-UTF-8 encodings survive the merge unchanged.
pub type Line = Vec<u8>;

/// Old-file lines that must survive the merge, keyed by 1-based line number.
///
/// Ordered by line number so that entries are always applied in the order
/// they appeared in the old file.
pub type KeepSet = BTreeMap<usize, Line>;

/// What to do when the lookup regex for a preserved key cannot be built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyLookup {
    /// Treat the key as absent and fall through to insert/append.
    #[default]
    Lenient,
    /// Abort the merge with [`PropkeepError::KeyPattern`](crate::PropkeepError::KeyPattern).
    Strict,
}

/// The change the merger made for a single preserved line.
///
/// `index` is 0-based into the merged line sequence at the time of the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAction {
    /// An existing line with the same key was overwritten.
    Replaced { key: String, index: usize },
    /// The key was missing; the line went back to its old position.
    Inserted { key: String, index: usize },
    /// The key was missing and its old position is past the end of the file.
    Appended { key: String, index: usize },
}

/// Where the two input files were copied before anything was modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupPaths {
    pub old: PathBuf,
    pub new: PathBuf,
}

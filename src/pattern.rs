//! Key pattern resolution: which lines of the old file must be preserved.
//!
//! The pattern comes from an optional JSON override file:
//!
//! ```json
//! { "patternKeys": "^(db\\.|secret\\.)" }
//! ```
//!
//! A missing file, or an empty or `null` `patternKeys`, selects
//! [`DEFAULT_PATTERN`]. The field name is matched exactly.
//! Unknown fields are warned about but otherwise ignored.

use std::path::Path;

use regex::bytes::Regex;
use serde::Deserialize;

use crate::error::PropkeepError;

/// Built-in pattern: datasource, cache, upload path, FTP and site identity keys.
pub const DEFAULT_PATTERN: &str = r"^(spring\.datasource|spring\.redis|web\.back\.upLoadPath|web\.front\.upLoadPath|token\.expireTime|ftp.userName|ftp.passWord|ftp.host|ftp.port|ftp.baseUrl|ftp.LocalDir|inco.system.xxmc|inco.system.maintitle|inco.person.xxdm|inco.security.login.checkcode)";

#[derive(Debug, Default, Deserialize)]
struct PatternOverride {
    #[serde(rename = "patternKeys", default)]
    pattern_keys: Option<String>,
}

/// Pure function: pick the pattern given the override file's content.
///
/// `content` is `None` when the override file does not exist.
pub fn pattern_from_override(content: Option<&str>, path: &Path) -> Result<String, PropkeepError> {
    let Some(content) = content else {
        tracing::debug!(path = %path.display(), "pattern file not found, using default pattern");
        return Ok(DEFAULT_PATTERN.to_string());
    };

    let mut deserializer = serde_json::Deserializer::from_str(content);
    let parsed: PatternOverride = serde_ignored::deserialize(&mut deserializer, |ignored| {
        tracing::warn!(path = %path.display(), field = %ignored, "ignoring unknown field in pattern file");
    })
    .and_then(|parsed| deserializer.end().map(|()| parsed))
    .map_err(|e| PropkeepError::PatternFileParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    match parsed.pattern_keys {
        Some(pattern) if !pattern.is_empty() => {
            tracing::debug!(path = %path.display(), pattern = %pattern, "loaded key pattern");
            Ok(pattern)
        }
        _ => {
            tracing::debug!(path = %path.display(), "patternKeys not set, using default pattern");
            Ok(DEFAULT_PATTERN.to_string())
        }
    }
}

/// Resolve the key pattern, reading the override file if it exists.
pub fn resolve_pattern(override_path: &Path) -> Result<String, PropkeepError> {
    let content = match std::fs::read_to_string(override_path) {
        Ok(c) => Some(c),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(PropkeepError::io(override_path, e)),
    };
    pattern_from_override(content.as_deref(), override_path)
}

/// Compile a key pattern for matching raw line bytes.
pub fn compile_pattern(pattern: &str) -> Result<Regex, PropkeepError> {
    Regex::new(pattern).map_err(|e| PropkeepError::InvalidPattern {
        pattern: pattern.to_string(),
        source: e,
    })
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropkeepError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse pattern file {path}: {source}")]
    PatternFileParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid key pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("Could not build lookup pattern for key '{key}': {source}")]
    KeyPattern { key: String, source: regex::Error },

    #[error("Line {line} of {path} exceeds the {limit}-byte limit")]
    LineTooLong {
        path: PathBuf,
        line: usize,
        limit: usize,
    },

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),
}

impl PropkeepError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PropkeepError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = PropkeepError::io(
            "/srv/app/application.properties",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        let msg = err.to_string();
        assert!(msg.contains("application.properties"));
    }

    #[test]
    fn line_too_long_formats() {
        let err = PropkeepError::LineTooLong {
            path: "old.properties".into(),
            line: 12,
            limit: 65536,
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("65536"));
        assert!(msg.contains("old.properties"));
    }

    #[test]
    fn invalid_pattern_shows_the_pattern() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = PropkeepError::InvalidPattern {
            pattern: "(unclosed".into(),
            source,
        };
        assert!(err.to_string().contains("(unclosed"));
    }
}

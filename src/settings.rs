//! Tool settings: where backups go, which pattern file to read, and how
//! lenient the merger is.
//!
//! Settings are layered the same way for every run:
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Platform config dir   ~/.config/propkeep/propkeep.toml (XDG on Linux)
//!        ↑ overridden by
//! Working directory     ./propkeep.toml
//!        ↑ overridden by
//! Environment vars      PROPKEEP_BACKUP_DIR, PROPKEEP_KEY_LOOKUP, ...
//!        ↑ overridden by
//! CLI flags             SettingsOverrides
//! ```
//!
//! Missing files are skipped. A file that exists but does not parse is an
//! error: silently running with a different backup directory than the
//! operator configured is worse than stopping.

use std::path::{Path, PathBuf};

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::error::PropkeepError;
use crate::types::KeyLookup;

/// File name looked up in each settings directory.
pub const SETTINGS_FILE_NAME: &str = "propkeep.toml";

const APP_NAME: &str = "propkeep";

/// On-disk / environment representation of the tool's settings.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolConfig {
    /// Directory that receives timestamped copies of both input files.
    #[config(default = "./config_backup", env = "PROPKEEP_BACKUP_DIR")]
    pub backup_dir: PathBuf,

    /// JSON file whose `patternKeys` field replaces the built-in key pattern.
    #[config(default = "config-matcher.json", env = "PROPKEEP_PATTERN_FILE")]
    pub pattern_file: PathBuf,

    /// Longest accepted line, in bytes, excluding the line terminator.
    #[config(default = 65536, env = "PROPKEEP_MAX_LINE_BYTES")]
    pub max_line_bytes: usize,

    /// What to do when a key's lookup pattern cannot be built: "lenient" or "strict".
    #[config(default = "lenient", env = "PROPKEEP_KEY_LOOKUP")]
    pub key_lookup: KeyLookup,
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub backup_dir: Option<PathBuf>,
    pub pattern_file: Option<PathBuf>,
    pub key_lookup: Option<KeyLookup>,
    pub verbose: bool,
}

/// Runtime settings handed to every component.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backup_dir: PathBuf,
    pub pattern_file: PathBuf,
    pub max_line_bytes: usize,
    pub key_lookup: KeyLookup,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_dir: PathBuf::from("./config_backup"),
            pattern_file: PathBuf::from("config-matcher.json"),
            max_line_bytes: 64 * 1024,
            key_lookup: KeyLookup::Lenient,
            verbose: false,
        }
    }
}

impl Settings {
    /// Load settings from the standard locations and apply CLI overrides.
    pub fn load(overrides: SettingsOverrides) -> Result<Self, PropkeepError> {
        let mut dirs = Vec::new();
        if let Some(proj) = directories::ProjectDirs::from("", "", APP_NAME) {
            dirs.push(proj.config_dir().to_path_buf());
        }
        if let Ok(cwd) = std::env::current_dir() {
            dirs.push(cwd);
        }
        Self::load_from(&dirs, true, overrides)
    }

    /// Like [`load`](Self::load) but with explicit settings directories
    /// (priority-ascending: last wins) and optional environment lookup.
    pub fn load_from(
        dirs: &[PathBuf],
        use_env: bool,
        overrides: SettingsOverrides,
    ) -> Result<Self, PropkeepError> {
        let mut builder = ToolConfig::builder();
        if use_env {
            builder = builder.env();
        }
        // confique gives earlier sources higher priority.
        for dir in dirs.iter().rev() {
            builder = builder.file(dir.join(SETTINGS_FILE_NAME));
        }
        let config = builder.load()?;
        tracing::debug!(?config, "resolved tool settings");
        Ok(Self::from_config(config, overrides))
    }

    fn from_config(config: ToolConfig, overrides: SettingsOverrides) -> Self {
        Self {
            backup_dir: overrides.backup_dir.unwrap_or(config.backup_dir),
            pattern_file: overrides.pattern_file.unwrap_or(config.pattern_file),
            max_line_bytes: config.max_line_bytes,
            key_lookup: overrides.key_lookup.unwrap_or(config.key_lookup),
            verbose: overrides.verbose,
        }
    }

    /// Settings rooted at `dir`: backups and pattern file live inside it.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            backup_dir: dir.join("config_backup"),
            pattern_file: dir.join("config-matcher.json"),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_files() {
        let dir = TempDir::new().unwrap();
        let settings =
            Settings::load_from(&[dir.path().to_path_buf()], false, Default::default()).unwrap();
        assert_eq!(settings.backup_dir, PathBuf::from("./config_backup"));
        assert_eq!(settings.pattern_file, PathBuf::from("config-matcher.json"));
        assert_eq!(settings.max_line_bytes, 65536);
        assert_eq!(settings.key_lookup, KeyLookup::Lenient);
        assert!(!settings.verbose);
    }

    #[test]
    fn file_overrides_default() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE_NAME),
            "backup_dir = \"/var/backups/app\"\nkey_lookup = \"strict\"\n",
        )
        .unwrap();
        let settings =
            Settings::load_from(&[dir.path().to_path_buf()], false, Default::default()).unwrap();
        assert_eq!(settings.backup_dir, PathBuf::from("/var/backups/app"));
        assert_eq!(settings.key_lookup, KeyLookup::Strict);
        assert_eq!(settings.max_line_bytes, 65536);
    }

    #[test]
    fn later_dir_wins() {
        let low = TempDir::new().unwrap();
        let high = TempDir::new().unwrap();
        fs::write(low.path().join(SETTINGS_FILE_NAME), "max_line_bytes = 10\n").unwrap();
        fs::write(high.path().join(SETTINGS_FILE_NAME), "max_line_bytes = 20\n").unwrap();

        let dirs = vec![low.path().to_path_buf(), high.path().to_path_buf()];
        let settings = Settings::load_from(&dirs, false, Default::default()).unwrap();
        assert_eq!(settings.max_line_bytes, 20);
    }

    #[test]
    fn cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE_NAME),
            "backup_dir = \"from-file\"\n",
        )
        .unwrap();
        let overrides = SettingsOverrides {
            backup_dir: Some("from-cli".into()),
            key_lookup: Some(KeyLookup::Strict),
            verbose: true,
            ..Default::default()
        };
        let settings = Settings::load_from(&[dir.path().to_path_buf()], false, overrides).unwrap();
        assert_eq!(settings.backup_dir, PathBuf::from("from-cli"));
        assert_eq!(settings.key_lookup, KeyLookup::Strict);
        assert!(settings.verbose);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "backup_dir = [oops\n").unwrap();
        let result = Settings::load_from(&[dir.path().to_path_buf()], false, Default::default());
        assert!(matches!(result, Err(PropkeepError::Settings(_))));
    }

    #[test]
    fn unknown_key_lookup_mode_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "key_lookup = \"loose\"\n").unwrap();
        let result = Settings::load_from(&[dir.path().to_path_buf()], false, Default::default());
        assert!(result.is_err());
    }

    #[test]
    fn in_dir_roots_paths() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::in_dir(dir.path());
        assert!(settings.backup_dir.starts_with(dir.path()));
        assert!(settings.pattern_file.starts_with(dir.path()));
    }
}

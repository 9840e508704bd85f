//! Command-line surface.
//!
//! [`Cli`] is the clap derive struct. [`Cli::into_invocation`] turns it into an
//! [`Invocation`], which is all `main` needs to decide what to do.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};

use crate::settings::SettingsOverrides;
use crate::types::KeyLookup;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Set `PROPKEEP_BUILD_DATE` at compile time to stamp release builds.
pub const BUILD_DATE: &str = match option_env!("PROPKEEP_BUILD_DATE") {
    Some(date) => date,
    None => "unknown",
};

const AFTER_HELP: &str = "\
Examples:
  propkeep old.properties new.properties
  propkeep -v old.properties new.properties";

/// Carry environment-specific keys from a deployed properties file into the
/// file shipped with a new release.
#[derive(Debug, Parser)]
#[command(name = "propkeep", disable_version_flag = true, after_help = AFTER_HELP)]
pub struct Cli {
    /// Currently deployed properties file (read only).
    pub old: Option<PathBuf>,

    /// New release's properties file (rewritten in place).
    pub new: Option<PathBuf>,

    /// Print diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Print version and build date.
    #[arg(short = 'V', long)]
    pub version: bool,

    /// Directory for timestamped backups of both files.
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// JSON file whose `patternKeys` replaces the built-in key pattern.
    #[arg(long, value_name = "FILE")]
    pub pattern_file: Option<PathBuf>,

    /// Fail instead of inserting when a key's lookup pattern cannot be built.
    #[arg(long)]
    pub strict_keys: bool,
}

/// What the binary should do.
#[derive(Debug, Clone)]
pub enum Invocation {
    Version,
    Usage,
    Merge {
        old: PathBuf,
        new: PathBuf,
        overrides: SettingsOverrides,
    },
}

impl Cli {
    /// Version wins over everything; missing positionals mean usage.
    pub fn into_invocation(self) -> Invocation {
        if self.version {
            return Invocation::Version;
        }
        let (Some(old), Some(new)) = (self.old, self.new) else {
            return Invocation::Usage;
        };
        Invocation::Merge {
            old,
            new,
            overrides: SettingsOverrides {
                backup_dir: self.backup_dir,
                pattern_file: self.pattern_file,
                key_lookup: self.strict_keys.then_some(KeyLookup::Strict),
                verbose: self.verbose,
            },
        }
    }
}

/// Accept the single-dash `-version` spelling older scripts use.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-version" {
                OsString::from("--version")
            } else {
                arg
            }
        })
        .collect()
}

pub fn version_text() -> String {
    format!("propkeep v{VERSION}\nbuild date: {BUILD_DATE}")
}

pub fn usage_text() -> String {
    Cli::command().render_help().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Invocation {
        let args = normalize_args(args.iter().map(OsString::from));
        Cli::try_parse_from(args).unwrap().into_invocation()
    }

    #[test]
    fn two_positionals_merge() {
        match parse(&["propkeep", "old.properties", "new.properties"]) {
            Invocation::Merge {
                old,
                new,
                overrides,
            } => {
                assert_eq!(old, PathBuf::from("old.properties"));
                assert_eq!(new, PathBuf::from("new.properties"));
                assert!(!overrides.verbose);
                assert_eq!(overrides.key_lookup, None);
                assert_eq!(overrides.backup_dir, None);
            }
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[test]
    fn verbose_flag() {
        match parse(&["propkeep", "-v", "a", "b"]) {
            Invocation::Merge { overrides, .. } => assert!(overrides.verbose),
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[test]
    fn no_args_is_usage() {
        assert!(matches!(parse(&["propkeep"]), Invocation::Usage));
    }

    #[test]
    fn one_positional_is_usage() {
        assert!(matches!(
            parse(&["propkeep", "old.properties"]),
            Invocation::Usage
        ));
    }

    #[test]
    fn single_dash_version() {
        assert!(matches!(
            parse(&["propkeep", "-version"]),
            Invocation::Version
        ));
    }

    #[test]
    fn version_beats_positionals() {
        assert!(matches!(
            parse(&["propkeep", "--version", "a", "b"]),
            Invocation::Version
        ));
    }

    #[test]
    fn settings_flags_are_threaded_through() {
        match parse(&[
            "propkeep",
            "--backup-dir",
            "/var/backups",
            "--pattern-file",
            "keys.json",
            "--strict-keys",
            "a",
            "b",
        ]) {
            Invocation::Merge { overrides, .. } => {
                assert_eq!(overrides.backup_dir, Some(PathBuf::from("/var/backups")));
                assert_eq!(overrides.pattern_file, Some(PathBuf::from("keys.json")));
                assert_eq!(overrides.key_lookup, Some(KeyLookup::Strict));
            }
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[test]
    fn unknown_flag_errors() {
        assert!(Cli::try_parse_from(["propkeep", "--nope", "a", "b"]).is_err());
    }

    #[test]
    fn version_text_has_version_and_date() {
        let text = version_text();
        assert!(text.contains(VERSION));
        assert!(text.contains("build date"));
    }

    #[test]
    fn usage_mentions_examples() {
        assert!(usage_text().contains("propkeep old.properties new.properties"));
    }
}

//! Carry environment-specific keys from a deployed `key=value` properties
//! file into the file shipped with a new release.
//!
//! ```ignore
//! let settings = Settings::load(SettingsOverrides::default())?;
//! let summary = pipeline::run(old, new, &settings, &mut std::io::stdout())?;
//! ```
//!
//! That call backs up both files, collects the old file's lines that match the
//! key pattern, writes them into the new file, and prints the matching lines
//! of the result.
//!
//! # Pipeline
//!
//! ```text
//! backup   old + new  → <backup_dir>/<name>.bak.<ts>, <name>.new.bak.<ts>
//! pattern  config-matcher.json "patternKeys", else the built-in pattern
//! extract  old file   → KeepSet (line number → line)
//! merge    KeepSet    → new file, rewritten atomically
//! report   new file   → matching lines on stdout
//! ```
//!
//! # Merge rules
//!
//! The new file wins everywhere except on preserved lines. For each preserved
//! line, in old-file order:
//!
//! - the key (text before the first `=`) already exists in the new file: the
//!   old line replaces it, formatting included;
//! - the key is missing and the old line number still exists in the new
//!   file: the old line is inserted there;
//! - otherwise the old line is appended.
//!
//! Insertions shift later positions, and later preserved lines see the
//! effect of earlier ones.
//!
//! # Failure model
//!
//! Backups are taken first. Any error during backup, extraction or merge
//! stops the run with a [`PropkeepError`]; the new file is replaced through a
//! temporary file, so it is either fully rewritten or untouched. Reporting
//! problems are logged as warnings and never fail the run.
//!
//! # Settings
//!
//! See [`settings`] for the layered tool configuration (`propkeep.toml`,
//! `PROPKEEP_*` environment variables, CLI flags).

pub mod backup;
pub mod cli;
pub mod error;
pub mod extract;
pub mod lines;
pub mod logging;
pub mod merge;
pub mod pattern;
pub mod pipeline;
pub mod report;
pub mod settings;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use error::PropkeepError;
pub use pipeline::{RunSummary, run};
pub use report::Report;
pub use settings::{Settings, SettingsOverrides, ToolConfig};
pub use types::{BackupPaths, KeepSet, KeyLookup, Line, MergeAction};

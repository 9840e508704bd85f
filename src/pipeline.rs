//! One run over a file pair: backup, extract, merge, report.
//!
//! The first fatal error stops the run. Backups are always taken before
//! anything else, so on failure the operator still has both originals.

use std::io::Write;
use std::path::Path;

use crate::backup;
use crate::error::PropkeepError;
use crate::extract;
use crate::merge;
use crate::pattern;
use crate::report::{self, Report};
use crate::settings::Settings;
use crate::types::{BackupPaths, MergeAction};

/// Printed before the report once the new file has been rewritten.
pub const COMPLETION_BANNER: &str =
    "Configuration updated: new file adopted, preserved keys kept in place.";

/// What a successful run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub backups: BackupPaths,
    pub pattern: String,
    pub actions: Vec<MergeAction>,
    pub report: Report,
}

/// Merge `old` into `new` with a freshly generated backup timestamp.
pub fn run<W: Write>(
    old: &Path,
    new: &Path,
    settings: &Settings,
    out: &mut W,
) -> Result<RunSummary, PropkeepError> {
    run_at(old, new, settings, &backup::timestamp(), out)
}

/// Like [`run`] with an explicit backup timestamp.
pub fn run_at<W: Write>(
    old: &Path,
    new: &Path,
    settings: &Settings,
    ts: &str,
    out: &mut W,
) -> Result<RunSummary, PropkeepError> {
    tracing::debug!(old = %old.display(), new = %new.display(), "starting merge");

    let backups = backup::backup_inputs(old, new, &settings.backup_dir, ts)?;

    let pattern = pattern::resolve_pattern(&settings.pattern_file)?;
    let keep = extract::extract_keep_lines(old, &pattern, settings)?;
    let actions = merge::merge_file(new, &keep, settings)?;

    if let Err(e) = writeln!(out, "{COMPLETION_BANNER}") {
        tracing::warn!(error = %e, "could not write completion banner");
    }
    let report = report::report_matches(new, settings, out);

    tracing::debug!("done");
    Ok(RunSummary {
        backups,
        pattern,
        actions,
        report,
    })
}

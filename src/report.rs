//! Post-merge report: list the lines of the final file that match the key
//! pattern so the operator can confirm what was preserved.
//!
//! Reporting is informational. Every failure is logged as a warning and the
//! report ends early; nothing here can fail the run. When the pattern or the
//! file cannot be loaded at all, nothing is printed.

use std::fmt;
use std::io::Write;
use std::path::Path;

use regex::bytes::Regex;

use crate::lines;
use crate::pattern;
use crate::settings::Settings;

const RULE: &str = "----------------------------";

/// Matching lines of the final file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// `(1-based line number, text)` for each match, in file order.
    pub matches: Vec<(usize, String)>,
    /// Set when the report stopped early.
    pub incomplete: bool,
    /// Set once the file was opened with a usable pattern.
    pub scanned: bool,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nMatched keys:")?;
        writeln!(f, "{RULE}")?;
        for (line_no, text) in &self.matches {
            writeln!(f, "{line_no:4}: {text}")?;
        }
        writeln!(f, "{RULE}")?;
        write!(f, "{} matching line(s)", self.matches.len())
    }
}

/// Pure function: numbered lines of `lines` that `re` matches.
///
/// Matching runs on raw bytes; the text is decoded lossily for display.
pub fn collect_matches<'a, I>(lines: I, re: &Regex) -> Vec<(usize, String)>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    lines
        .into_iter()
        .enumerate()
        .filter(|(_, line)| re.is_match(line))
        .map(|(i, line)| (i + 1, String::from_utf8_lossy(line).into_owned()))
        .collect()
}

/// Scan `path` with a freshly resolved pattern. Never fails.
pub fn scan_matches(path: &Path, settings: &Settings) -> Report {
    let mut report = Report::default();

    let re = match pattern::resolve_pattern(&settings.pattern_file)
        .and_then(|p| pattern::compile_pattern(&p))
    {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(error = %e, "could not load key pattern for report");
            report.incomplete = true;
            return report;
        }
    };

    let reader = match lines::open_lines(path, settings.max_line_bytes) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "could not open merged file for report");
            report.incomplete = true;
            return report;
        }
    };
    report.scanned = true;

    let mut read = Vec::new();
    for item in reader {
        match item {
            Ok((_, text)) => read.push(text),
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading merged file for report");
                report.incomplete = true;
                break;
            }
        }
    }
    report.matches = collect_matches(read.iter().map(Vec::as_slice), &re);
    report
}

/// Scan `path` and print the report to `out`. Never fails.
pub fn report_matches<W: Write>(path: &Path, settings: &Settings, out: &mut W) -> Report {
    let report = scan_matches(path, settings);
    if !report.scanned {
        return report;
    }
    if let Err(e) = writeln!(out, "{report}") {
        tracing::warn!(error = %e, "could not write report");
    }
    report
}

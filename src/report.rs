//! Aggregate outcome rendering
//!
//! Collects per-status counts over the resolved entries and renders either a
//! plain-text report for the terminal or a JSON document for tooling.

use std::fmt::Write as _;

use serde::Serialize;

use crate::parser::types::{Entry, EntryStatus};

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(()),
        }
    }
}

/// Counts plus per-entry detail. Statuses are mutually exclusive, so the
/// four counts partition the entry set.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub up_to_date: usize,
    pub outdated: usize,
    pub skipped: usize,
    pub problem: usize,
    pub entries: &'a [Entry],
}

impl<'a> Report<'a> {
    pub fn build(entries: &'a [Entry]) -> Self {
        let mut report = Report {
            up_to_date: 0,
            outdated: 0,
            skipped: 0,
            problem: 0,
            entries,
        };
        for entry in entries {
            match entry.status {
                EntryStatus::UpToDate => report.up_to_date += 1,
                EntryStatus::Outdated => report.outdated += 1,
                EntryStatus::Skipped => report.skipped += 1,
                EntryStatus::Problem => report.problem += 1,
            }
        }
        report
    }

    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} packages: {} up to date, {} outdated, {} skipped, {} problem",
            self.entries.len(),
            self.up_to_date,
            self.outdated,
            self.skipped,
            self.problem
        );
        for entry in self.entries {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}  {}", status_label(entry.status), entry.path);
            match entry.status {
                EntryStatus::UpToDate => {
                    let _ = writeln!(out, "          pinned   {}", entry.pinned_version);
                }
                EntryStatus::Outdated => {
                    let _ = writeln!(out, "          pinned   {}", entry.pinned_version);
                    let _ = writeln!(
                        out,
                        "          latest   {}  {}",
                        entry.resolved_version, entry.resolved_timestamp
                    );
                    if !entry.diff_summary.is_empty() {
                        let _ = writeln!(out, "          diff     {}", entry.diff_summary);
                    }
                    if !entry.compare_url.is_empty() {
                        let _ = writeln!(out, "          compare  {}", entry.compare_url);
                    }
                    if !entry.releases_url.is_empty() {
                        let _ = writeln!(out, "          releases {}", entry.releases_url);
                    }
                }
                EntryStatus::Skipped | EntryStatus::Problem => {
                    let _ = writeln!(out, "          {}", entry.summary);
                }
            }
        }
        out
    }
}

fn status_label(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::UpToDate => "ok      ",
        EntryStatus::Outdated => "outdated",
        EntryStatus::Skipped => "skipped ",
        EntryStatus::Problem => "problem ",
    }
}

//! Per-entry resolution
//!
//! Given one parsed entry and its local checkout, decide whether the pin is
//! up to date, stale, or in trouble, and collect the supporting summary data
//! (diff summary, compare URL, timestamps).
//!
//! Resolution is fail-fast per entry: the first version-control failure marks
//! the entry Problem with the underlying message and stops. A diff-summary
//! failure downgrades an already-Outdated entry to Problem rather than being
//! tolerated silently.

use std::path::Path;

use tracing::debug;

use crate::git::VcsClient;
use crate::parser::types::{Entry, PinKind};

/// Resolves a single entry against its checkout.
pub struct EntryResolver<'a, C: VcsClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: VcsClient + ?Sized> EntryResolver<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Resolve `entry` in place. Mutates only the entry, never the manifest
    /// text. Skipped entries are the caller's responsibility and never reach
    /// this point.
    pub fn resolve(&self, entry: &mut Entry, checkout: &Path) {
        if entry.declared_remote.is_none() {
            match self.client.remote_url(checkout) {
                Ok(url) => entry.resolved_remote_url = url,
                Err(err) => {
                    entry.mark_problem(err);
                    return;
                }
            }
        }
        entry.releases_url = format!("{}/releases", trim_git_suffix(&entry.resolved_remote_url));
        match entry.pin_kind {
            PinKind::Commit => self.resolve_commit(entry, checkout),
            PinKind::BranchOrTag => self.resolve_branch_or_tag(entry, checkout),
        }
        debug!("resolved {}: {:?}", entry.path, entry.status);
    }

    /// Commit pins compare full hashes by exact string equality.
    fn resolve_commit(&self, entry: &mut Entry, checkout: &Path) {
        let latest = match self.client.latest_commit(checkout) {
            Ok(latest) => latest,
            Err(err) => {
                entry.mark_problem(err);
                return;
            }
        };
        entry.resolved_version = latest.hash;
        entry.resolved_timestamp = latest.timestamp;
        if entry.pinned_version == entry.resolved_version {
            return;
        }
        entry.mark_outdated();
        match self
            .client
            .diff_summary(checkout, &entry.pinned_version, &entry.resolved_version)
        {
            Ok(summary) => entry.diff_summary = summary,
            Err(err) => {
                entry.mark_problem(err);
                return;
            }
        }
        entry.compare_url = format!(
            "{}/compare/{}...{}",
            trim_git_suffix(&entry.resolved_remote_url),
            entry.pinned_version,
            entry.resolved_version
        );
    }

    /// Tag pins compare tag names; the diff and compare URL use the commits
    /// the two tags point at.
    fn resolve_branch_or_tag(&self, entry: &mut Entry, checkout: &Path) {
        let pinned_commit = match self.client.commit_for_tag(checkout, &entry.pinned_version) {
            Ok(commit) => commit,
            Err(err) => {
                entry.mark_problem(err);
                return;
            }
        };
        let latest = match self.client.latest_tag(checkout) {
            Ok(latest) => latest,
            Err(err) => {
                entry.mark_problem(err);
                return;
            }
        };
        entry.resolved_version = latest.name;
        entry.resolved_timestamp = latest.timestamp;
        if entry.pinned_version == entry.resolved_version {
            return;
        }
        entry.mark_outdated();
        match self
            .client
            .diff_summary(checkout, &pinned_commit, &latest.commit)
        {
            Ok(summary) => entry.diff_summary = summary,
            Err(err) => {
                entry.mark_problem(err);
                return;
            }
        }
        entry.compare_url = format!(
            "{}/compare/{}...{}",
            trim_git_suffix(&entry.resolved_remote_url),
            pinned_commit,
            latest.commit
        );
    }
}

/// Drop a trailing `.git` so compare/releases links land on the project page.
fn trim_git_suffix(url: &str) -> &str {
    url.strip_suffix(".git").unwrap_or(url)
}

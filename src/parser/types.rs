//! Common types for manifest parsers

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;

use crate::util::is_hex_token;

/// Manifest dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// Flat one-line-per-entry format: `<path> <version> [git.remote=<url>]`
    Gpm,
    /// Block-stanza format: `name` / `source` / `revision` / `version` fields
    Gopkg,
}

impl ManifestFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestFormat::Gpm => "gpm",
            ManifestFormat::Gopkg => "gopkg",
        }
    }
}

impl std::str::FromStr for ManifestFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gpm" => Ok(ManifestFormat::Gpm),
            "gopkg" => Ok(ManifestFormat::Gopkg),
            _ => Err(()),
        }
    }
}

/// Detect the manifest dialect from the file name.
pub fn detect_format(path: &Path) -> Option<ManifestFormat> {
    let name = path.file_name()?.to_str()?;
    if name == "Gopkg.toml" {
        Some(ManifestFormat::Gopkg)
    } else if name.starts_with("Godeps") {
        Some(ManifestFormat::Gpm)
    } else {
        None
    }
}

/// How a dependency is pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinKind {
    /// Pinned to an exact commit hash.
    Commit,
    /// Pinned to a branch or tag name.
    BranchOrTag,
}

/// Resolution outcome for one entry. Mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Pin matches the latest upstream state (or not yet resolved).
    UpToDate,
    /// A newer upstream commit/tag exists.
    Outdated,
    /// The manifest line uses an unsupported addressing scheme.
    Skipped,
    /// A version-control query failed for this entry.
    Problem,
}

/// One pinned dependency from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Import/package identifier. Duplicates are legal and tolerated.
    pub path: String,
    /// Classified once at construction from the version token.
    pub pin_kind: PinKind,
    /// Version token exactly as written in the manifest.
    pub pinned_version: String,
    /// Explicit remote from the manifest, if any.
    pub declared_remote: Option<String>,
    /// Remote URL used for human-facing links.
    pub resolved_remote_url: String,
    /// Releases page derived from the remote URL.
    pub releases_url: String,
    pub status: EntryStatus,
    /// Latest upstream version (commit hash or tag name).
    pub resolved_version: String,
    /// "absolute (relative)" timestamp of the resolved version.
    pub resolved_timestamp: String,
    /// Shortstat diff between pinned and resolved state.
    pub diff_summary: String,
    /// Compare link between pinned and resolved state.
    pub compare_url: String,
    /// Error or skip explanation, when there is one.
    pub summary: String,
}

impl Entry {
    pub fn new(path: impl Into<String>, version: impl Into<String>, remote: Option<String>) -> Self {
        let pinned_version = version.into();
        let pin_kind = if is_hex_token(&pinned_version) {
            PinKind::Commit
        } else {
            PinKind::BranchOrTag
        };
        let resolved_remote_url = remote.clone().unwrap_or_default();
        Self {
            path: path.into(),
            pin_kind,
            pinned_version,
            declared_remote: remote,
            resolved_remote_url,
            releases_url: String::new(),
            status: EntryStatus::UpToDate,
            resolved_version: String::new(),
            resolved_timestamp: String::new(),
            diff_summary: String::new(),
            compare_url: String::new(),
            summary: String::new(),
        }
    }

    /// Skipped is decided from manifest syntax alone and is final.
    pub fn mark_skipped(&mut self, summary: impl Into<String>) {
        self.status = EntryStatus::Skipped;
        self.summary = summary.into();
    }

    /// Record a version-control failure. Skipped entries stay Skipped;
    /// an Outdated entry is downgraded to Problem.
    pub fn mark_problem(&mut self, err: impl std::fmt::Display) {
        if self.status == EntryStatus::Skipped {
            return;
        }
        self.status = EntryStatus::Problem;
        self.summary = err.to_string();
    }

    /// Record a stale pin. Never overrides Skipped or Problem.
    pub fn mark_outdated(&mut self) {
        if self.status == EntryStatus::UpToDate {
            self.status = EntryStatus::Outdated;
        }
    }
}

/// Original substrings retained at parse time for surgical rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteIndex {
    /// Flat formats: path -> the exact original line.
    Lines(HashMap<String, String>),
    /// Block formats: the rewrite walks the stanza text keyed by `name`.
    Stanzas,
}

/// A parsed manifest: entries in file order, the untouched original text,
/// and the rewrite index.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub entries: Vec<Entry>,
    pub original: String,
    pub index: RewriteIndex,
}

//! Flat (GPM-style) manifest parser
//!
//! One dependency per line, whitespace-separated:
//!
//! ```text
//! # comment
//! github.com/foo/bar   a1b2c3d4e5
//! github.com/baz/qux   v1.2.0   git.remote=https://mirror.example.com/qux.git
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::parser::traits::{ManifestParser, RewriteOutcome};
use crate::parser::types::{Entry, EntryStatus, Manifest, RewriteIndex};

pub const UNSUPPORTED_PATH_SUMMARY: &str = "packages with @ in their paths aren't supported (yet)";

/// Parser for flat manifests.
pub struct GpmParser {
    root: PathBuf,
    manifest_path: PathBuf,
    /// Matches the optional third field: `git.remote=<url>`
    remote_re: Regex,
}

impl GpmParser {
    pub fn new(root: impl Into<PathBuf>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest_path: manifest_path.into(),
            remote_re: Regex::new(r"^git\.remote=(\S+)$").unwrap(),
        }
    }
}

impl ManifestParser for GpmParser {
    fn parse(&self, content: &str) -> Manifest {
        let mut entries = Vec::new();
        let mut lines = HashMap::new();
        for line in content.split('\n') {
            if line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 2 {
                continue;
            }
            let remote = tokens
                .get(2)
                .and_then(|t| self.remote_re.captures(t))
                .map(|caps| caps[1].to_string());
            let mut entry = Entry::new(tokens[0], tokens[1], remote);
            if line.starts_with("git@") {
                info!("{UNSUPPORTED_PATH_SUMMARY}. line: {line}");
                entry.mark_skipped(UNSUPPORTED_PATH_SUMMARY);
            }
            lines.insert(tokens[0].to_string(), line.to_string());
            entries.push(entry);
        }
        debug!("parsed {} entries", entries.len());
        Manifest {
            entries,
            original: content.to_string(),
            index: RewriteIndex::Lines(lines),
        }
    }

    fn rewrite(&self, manifest: &Manifest) -> RewriteOutcome {
        let RewriteIndex::Lines(lines) = &manifest.index else {
            return RewriteOutcome {
                text: manifest.original.clone(),
                changed: false,
            };
        };
        let mut text = manifest.original.clone();
        let mut changed = false;
        for entry in &manifest.entries {
            if entry.status != EntryStatus::Outdated {
                continue;
            }
            let Some(old_line) = lines.get(&entry.path) else {
                continue;
            };
            debug!("updating entry {}", entry.path);
            let new_line = old_line.replacen(&entry.pinned_version, &entry.resolved_version, 1);
            text = text.replacen(old_line.as_str(), &new_line, 1);
            changed = true;
        }
        RewriteOutcome { text, changed }
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }
}

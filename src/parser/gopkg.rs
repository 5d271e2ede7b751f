//! Block-stanza (Gopkg-style) manifest parser
//!
//! A stanza opens with a `name` field and runs until the next `name` or end
//! of file:
//!
//! ```text
//! [[constraint]]
//!   name = "github.com/foo/bar"
//!   source = "https://mirror.example.com/bar.git"
//!   revision = "a1b2c3d4e5"
//! ```
//!
//! Exactly one of `revision` (commit pin) or `version` (tag pin) supplies
//! the version token.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::parser::gpm::UNSUPPORTED_PATH_SUMMARY;
use crate::parser::traits::{ManifestParser, RewriteOutcome};
use crate::parser::types::{Entry, EntryStatus, Manifest, PinKind, RewriteIndex};
use crate::util::strip_quotes;

/// Parser for block-stanza manifests.
pub struct GopkgParser {
    root: PathBuf,
    manifest_path: PathBuf,
}

impl GopkgParser {
    pub fn new(root: impl Into<PathBuf>, manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            manifest_path: manifest_path.into(),
        }
    }
}

/// Fields gathered while walking one stanza.
#[derive(Default)]
struct Stanza {
    path: String,
    source: Option<String>,
    pin: Option<(PinKind, String)>,
    skipped: bool,
}

impl Stanza {
    /// A stanza without a name or a pin is malformed and dropped, unless it
    /// was already marked skipped for its addressing scheme.
    fn build(self) -> Option<Entry> {
        if self.path.is_empty() {
            return None;
        }
        match self.pin {
            Some((kind, version)) => {
                let mut entry = Entry::new(self.path, version, self.source);
                // the field name decides the kind, not the token shape
                entry.pin_kind = kind;
                if self.skipped {
                    entry.mark_skipped(UNSUPPORTED_PATH_SUMMARY);
                }
                Some(entry)
            }
            None if self.skipped => {
                let mut entry = Entry::new(self.path, "", self.source);
                entry.mark_skipped(UNSUPPORTED_PATH_SUMMARY);
                Some(entry)
            }
            None => None,
        }
    }
}

impl ManifestParser for GopkgParser {
    fn parse(&self, content: &str) -> Manifest {
        let mut entries = Vec::new();
        let mut current = Stanza::default();
        for line in content.split('\n') {
            if line.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 3 {
                continue;
            }
            let value = strip_quotes(tokens[2]);
            match tokens[0] {
                "name" => {
                    if let Some(entry) = std::mem::take(&mut current).build() {
                        entries.push(entry);
                    }
                    current.path = value;
                }
                "source" => {
                    if value.starts_with("git@") {
                        info!("{UNSUPPORTED_PATH_SUMMARY}. line: {line}");
                        current.skipped = true;
                    } else {
                        current.source = Some(value);
                    }
                }
                "revision" => current.pin = Some((PinKind::Commit, value)),
                "version" => current.pin = Some((PinKind::BranchOrTag, value)),
                _ => {}
            }
        }
        if let Some(entry) = current.build() {
            entries.push(entry);
        }
        debug!("parsed {} entries", entries.len());
        Manifest {
            entries,
            original: content.to_string(),
            index: RewriteIndex::Stanzas,
        }
    }

    fn rewrite(&self, manifest: &Manifest) -> RewriteOutcome {
        let outdated: HashMap<&str, &Entry> = manifest
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Outdated)
            .map(|e| (e.path.as_str(), e))
            .collect();
        let mut changed = false;
        let mut pending: Option<&Entry> = None;
        let mut out: Vec<String> = Vec::new();
        for line in manifest.original.split('\n') {
            if line.starts_with('#') {
                out.push(line.to_string());
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 3 {
                out.push(line.to_string());
                continue;
            }
            match tokens[0] {
                "name" => {
                    pending = outdated.get(strip_quotes(tokens[2]).as_str()).copied();
                    out.push(line.to_string());
                }
                "revision" | "version" => match pending.take() {
                    Some(entry) => {
                        debug!("updating entry {}", entry.path);
                        out.push(line.replacen(
                            &entry.pinned_version,
                            &entry.resolved_version,
                            1,
                        ));
                        changed = true;
                    }
                    None => out.push(line.to_string()),
                },
                _ => out.push(line.to_string()),
            }
        }
        if !changed {
            return RewriteOutcome {
                text: manifest.original.clone(),
                changed: false,
            };
        }
        RewriteOutcome {
            text: out.join("\n"),
            changed: true,
        }
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }
}

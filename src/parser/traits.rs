//! Manifest parser trait definition

use std::path::Path;

use crate::parser::types::Manifest;

/// Result of a manifest rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// The full manifest text after substitution.
    pub text: String,
    /// Whether any entry was actually rewritten. When `false`, `text` is
    /// byte-identical to the original and callers must not write it back.
    pub changed: bool,
}

/// Capability set shared by all manifest dialects.
///
/// The analyzer and the write-back step depend only on this trait, never on
/// a concrete format.
pub trait ManifestParser {
    /// Parse manifest text into entries plus a rewrite index.
    ///
    /// Comment lines and malformed lines are passed over without error;
    /// entries with an unsupported addressing scheme come back marked
    /// Skipped.
    fn parse(&self, content: &str) -> Manifest;

    /// Produce updated manifest text, replacing only the version token of
    /// Outdated entries and leaving every other byte untouched.
    fn rewrite(&self, manifest: &Manifest) -> RewriteOutcome;

    /// Repository root the manifest belongs to.
    fn root(&self) -> &Path;

    /// Location of the manifest file itself.
    fn manifest_path(&self) -> &Path;
}

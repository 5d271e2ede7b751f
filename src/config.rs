//! Run configuration threaded from the CLI.
//!
//! The tool deliberately carries no ambient global state: everything the
//! library layers need (paths, format choice, write-back toggle) travels in a
//! [`Settings`] value built once in `main`.

use std::path::PathBuf;

use crate::parser::types::ManifestFormat;
use crate::report::ReportFormat;

/// Everything a single run needs, resolved from CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the dependency manifest file.
    pub manifest_path: PathBuf,
    /// Root directory under which package checkouts live (created if absent).
    pub package_root: PathBuf,
    /// Manifest dialect; `None` means detect from the file name.
    pub format: Option<ManifestFormat>,
    /// Rewrite the manifest in place when stale pins are found.
    pub write_back: bool,
    /// How to render the final report.
    pub report: ReportFormat,
    /// Optional dependency-install command run after resolution.
    pub install: Option<CommandSpec>,
    /// Optional build command run after resolution.
    pub build: Option<CommandSpec>,
}

/// A post-resolution command: program, working directory, whitespace-split args.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub dir: Option<PathBuf>,
    pub args: Option<String>,
}

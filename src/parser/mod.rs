//! Manifest parsing layer
//! - traits.rs: ManifestParser trait and RewriteOutcome
//! - types.rs: Common types (Entry, PinKind, EntryStatus, Manifest)
//! - gpm.rs: flat one-line-per-entry format
//! - gopkg.rs: block-stanza format

use std::path::Path;

pub mod gopkg;
pub mod gpm;
pub mod traits;
pub mod types;

pub use gopkg::GopkgParser;
pub use gpm::GpmParser;
pub use traits::{ManifestParser, RewriteOutcome};
pub use types::{Entry, EntryStatus, Manifest, ManifestFormat, PinKind, detect_format};

/// Build the parser for a dialect.
pub fn parser_for(
    format: ManifestFormat,
    root: &Path,
    manifest_path: &Path,
) -> Box<dyn ManifestParser> {
    match format {
        ManifestFormat::Gpm => Box::new(GpmParser::new(root, manifest_path)),
        ManifestFormat::Gopkg => Box::new(GopkgParser::new(root, manifest_path)),
    }
}

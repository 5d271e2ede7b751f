//! Batch analysis
//!
//! Drives [`EntryResolver`] over every parsed entry, owning the one
//! side-effecting precondition: the package checkout must exist locally and
//! be reasonably fresh before it is inspected.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::git::VcsClient;
use crate::parser::types::{Entry, EntryStatus};
use crate::resolve::resolver::EntryResolver;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The package root could not be created. Fatal to the whole run.
    #[error("failed to create package root {}: {source}", path.display())]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs the full batch against one package root.
pub struct BatchAnalyzer<'a, C: VcsClient + ?Sized> {
    client: &'a C,
    package_root: PathBuf,
}

impl<'a, C: VcsClient + ?Sized> BatchAnalyzer<'a, C> {
    pub fn new(client: &'a C, package_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            package_root: package_root.into(),
        }
    }

    /// Analyze all entries in manifest order.
    ///
    /// Entries stay strictly sequential: duplicate manifest paths may alias
    /// the same checkout directory, and concurrent fetch/pull of one
    /// directory is unsafe without per-path locking.
    pub fn analyze(&self, entries: &mut [Entry]) -> Result<(), AnalyzeError> {
        fs::create_dir_all(&self.package_root).map_err(|source| AnalyzeError::CreateRoot {
            path: self.package_root.clone(),
            source,
        })?;
        for entry in entries.iter_mut() {
            if entry.status == EntryStatus::Skipped {
                continue;
            }
            info!("analyzing package {}", entry.path);
            let checkout = self.package_root.join(&entry.path);
            if self.prepare_checkout(entry, &checkout) {
                EntryResolver::new(self.client).resolve(entry, &checkout);
            }
            debug!("** package {} - data: {:?}", entry.path, entry);
        }
        Ok(())
    }

    /// Fetch or refresh the checkout. Returns false when a precondition
    /// failure already marked the entry Problem.
    fn prepare_checkout(&self, entry: &mut Entry, checkout: &Path) -> bool {
        if !checkout.is_dir() {
            info!("getting package {}", entry.path);
            if let Err(err) =
                self.client
                    .ensure_present(&entry.path, checkout, entry.declared_remote.clone())
            {
                entry.mark_problem(err);
                return false;
            }
        } else {
            if let Some(remote) = &entry.declared_remote {
                if let Err(err) = self.client.add_secondary_remote(checkout, remote) {
                    entry.mark_problem(err);
                    return false;
                }
            }
            self.client.pull_latest(checkout);
        }
        true
    }
}

//! Version-control client trait.
//!
//! Everything the resolver and analyzer need from the underlying tool,
//! expressed as a capability set so tests can substitute a fake.

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

use crate::git::error::GitError;

/// The latest commit of a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Full commit hash.
    pub hash: String,
    /// Preformatted "absolute (relative)" commit date.
    pub timestamp: String,
}

/// The latest release tag of a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// Commit the tag points at.
    pub commit: String,
    /// Tag name.
    pub name: String,
    /// Preformatted "absolute (relative)" tag creation date.
    pub timestamp: String,
}

/// Read-only queries and the few mutating operations the analyzer needs.
///
/// All string fields returned by implementations must already have
/// surrounding quotes stripped.
#[cfg_attr(test, automock)]
pub trait VcsClient {
    /// Latest commit on the current branch of `repo`.
    fn latest_commit(&self, repo: &Path) -> Result<CommitInfo, GitError>;

    /// Latest release tag of `repo`, after ignore-list filtering.
    fn latest_tag(&self, repo: &Path) -> Result<TagInfo, GitError>;

    /// Commit hash a tag name points at.
    fn commit_for_tag(&self, repo: &Path, tag: &str) -> Result<String, GitError>;

    /// One-line shortstat diff between two revisions.
    fn diff_summary(&self, repo: &Path, from: &str, to: &str) -> Result<String, GitError>;

    /// Remote URL of `repo`, trying the primary remote then the secondary.
    fn remote_url(&self, repo: &Path) -> Result<String, GitError>;

    /// Toplevel of the repository containing `start`.
    fn repo_root(&self, start: &Path) -> Result<PathBuf, GitError>;

    /// Fetch a package checkout into `dest` when it does not exist yet.
    fn ensure_present(
        &self,
        package: &str,
        dest: &Path,
        remote: Option<String>,
    ) -> Result<(), GitError>;

    /// Register and fetch the secondary remote. "Already exists" is success.
    fn add_secondary_remote(&self, repo: &Path, url: &str) -> Result<(), GitError>;

    /// Bring the primary branch up to date. Best-effort: logs, never fails.
    fn pull_latest(&self, repo: &Path);
}

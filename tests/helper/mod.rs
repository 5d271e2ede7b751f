//! Shared fake version-control client for integration tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use depfresh::git::{CommitInfo, GitError, TagInfo, VcsClient};

/// Canned upstream state for one package checkout.
#[derive(Debug, Clone, Default)]
pub struct RepoState {
    pub latest_commit: String,
    pub commit_timestamp: String,
    pub latest_tag: Option<(String, String, String)>, // (commit, name, timestamp)
    pub tag_commits: HashMap<String, String>,
    pub remote_url: String,
    pub diff: String,
    pub diff_fails: bool,
}

/// In-memory `VcsClient` keyed by checkout directory name.
#[derive(Default)]
pub struct FakeClient {
    repos: HashMap<String, RepoState>,
    pub fetched: RefCell<Vec<String>>,
    pub pulled: RefCell<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, package: &str, state: RepoState) -> Self {
        self.repos.insert(package.to_string(), state);
        self
    }

    fn state(&self, repo: &Path) -> Result<&RepoState, GitError> {
        self.repos
            .iter()
            .find(|(package, _)| repo.ends_with(package.as_str()))
            .map(|(_, state)| state)
            .ok_or_else(|| GitError::CommandFailed {
                operation: "lookup".to_string(),
                path: repo.to_path_buf(),
                output: "no such repository".to_string(),
            })
    }
}

impl VcsClient for FakeClient {
    fn latest_commit(&self, repo: &Path) -> Result<CommitInfo, GitError> {
        let state = self.state(repo)?;
        Ok(CommitInfo {
            hash: state.latest_commit.clone(),
            timestamp: state.commit_timestamp.clone(),
        })
    }

    fn latest_tag(&self, repo: &Path) -> Result<TagInfo, GitError> {
        let state = self.state(repo)?;
        let (commit, name, timestamp) =
            state.latest_tag.clone().ok_or_else(|| GitError::NoUsableTag {
                path: repo.to_path_buf(),
            })?;
        Ok(TagInfo {
            commit,
            name,
            timestamp,
        })
    }

    fn commit_for_tag(&self, repo: &Path, tag: &str) -> Result<String, GitError> {
        let state = self.state(repo)?;
        state
            .tag_commits
            .get(tag)
            .cloned()
            .ok_or_else(|| GitError::EmptyOutput {
                operation: format!("log for tag {tag}"),
                path: repo.to_path_buf(),
            })
    }

    fn diff_summary(&self, repo: &Path, _from: &str, _to: &str) -> Result<String, GitError> {
        let state = self.state(repo)?;
        if state.diff_fails {
            return Err(GitError::CommandFailed {
                operation: "diff".to_string(),
                path: repo.to_path_buf(),
                output: "bad revision".to_string(),
            });
        }
        Ok(state.diff.clone())
    }

    fn remote_url(&self, repo: &Path) -> Result<String, GitError> {
        Ok(self.state(repo)?.remote_url.clone())
    }

    fn repo_root(&self, start: &Path) -> Result<PathBuf, GitError> {
        Ok(start.to_path_buf())
    }

    fn ensure_present(
        &self,
        package: &str,
        dest: &Path,
        _remote: Option<String>,
    ) -> Result<(), GitError> {
        self.fetched.borrow_mut().push(package.to_string());
        if self.repos.keys().any(|known| known == package) {
            Ok(())
        } else {
            Err(GitError::CommandFailed {
                operation: "clone".to_string(),
                path: dest.to_path_buf(),
                output: "repository not found".to_string(),
            })
        }
    }

    fn add_secondary_remote(&self, _repo: &Path, _url: &str) -> Result<(), GitError> {
        Ok(())
    }

    fn pull_latest(&self, repo: &Path) {
        self.pulled
            .borrow_mut()
            .push(repo.display().to_string());
    }
}

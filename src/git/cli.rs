//! System `git` implementation of [`VcsClient`].
//!
//! Thin pass-through over `git` subprocess invocations. Output fields are
//! quote-stripped before they leave this module.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::git::client::{CommitInfo, TagInfo, VcsClient};
use crate::git::error::GitError;
use crate::util::strip_quotes;

/// Name under which a manifest-declared remote is registered.
pub const SECONDARY_REMOTE: &str = "downstream";

/// Tags containing any of these are pre-release builds and never count as latest.
const IGNORED_TAG_MARKERS: [&str; 3] = ["rc", "night", "unstable"];

/// `VcsClient` backed by the system `git` binary.
pub struct GitCli;

impl GitCli {
    pub fn new() -> Self {
        Self
    }

    /// Run `git -C <repo> <args>`, returning stdout on success.
    fn run(&self, repo: &Path, operation: &str, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(repo).args(args);
        debug!("running {:?}", cmd);
        let output = cmd.output().map_err(|source| GitError::Spawn {
            path: repo.to_path_buf(),
            source,
        })?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                operation: operation.to_string(),
                path: repo.to_path_buf(),
                output: combined_output(&output.stdout, &output.stderr),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsClient for GitCli {
    fn latest_commit(&self, repo: &Path) -> Result<CommitInfo, GitError> {
        let out = self.run(
            repo,
            "log",
            &["--no-pager", "log", "--pretty=format:%H;%cd;%cr", "-n", "1"],
        )?;
        let first = out.lines().next().unwrap_or_default();
        let fields: Vec<&str> = first.split(';').collect();
        if fields.len() < 3 {
            return Err(GitError::EmptyOutput {
                operation: "log".to_string(),
                path: repo.to_path_buf(),
            });
        }
        Ok(CommitInfo {
            hash: strip_quotes(fields[0]),
            timestamp: format!("{} ({})", strip_quotes(fields[1]), strip_quotes(fields[2])),
        })
    }

    fn latest_tag(&self, repo: &Path) -> Result<TagInfo, GitError> {
        let out = self.run(
            repo,
            "tag",
            &[
                "--no-pager",
                "tag",
                "--format=%(creatordate:iso);%(creatordate:relative);%(refname:strip=2)",
                "--sort=tag",
            ],
        )?;
        let (date, relative, name) =
            select_latest_tag(&out).ok_or_else(|| GitError::NoUsableTag {
                path: repo.to_path_buf(),
            })?;
        let commit = self.commit_for_tag(repo, &name)?;
        Ok(TagInfo {
            commit,
            name,
            timestamp: format!("{date} ({relative})"),
        })
    }

    fn commit_for_tag(&self, repo: &Path, tag: &str) -> Result<String, GitError> {
        let out = self.run(
            repo,
            "log",
            &["--no-pager", "log", "--pretty=format:%H", "-1", tag],
        )?;
        let first = out.lines().next().map(strip_quotes).unwrap_or_default();
        if first.is_empty() {
            return Err(GitError::EmptyOutput {
                operation: format!("log for tag {tag}"),
                path: repo.to_path_buf(),
            });
        }
        Ok(first)
    }

    fn diff_summary(&self, repo: &Path, from: &str, to: &str) -> Result<String, GitError> {
        debug!("getting diff summary for {}", repo.display());
        let out = self.run(repo, "diff", &["diff", "--shortstat", from, to])?;
        Ok(out.lines().next().unwrap_or_default().trim().to_string())
    }

    fn remote_url(&self, repo: &Path) -> Result<String, GitError> {
        let out = match self.run(repo, "config", &["config", "--get", "remote.origin.url"]) {
            Ok(out) => out,
            Err(_) => {
                debug!("origin remote unset, trying {SECONDARY_REMOTE}");
                self.run(
                    repo,
                    "config",
                    &["config", "--get", "remote.downstream.url"],
                )?
            }
        };
        let first = out.lines().next().map(strip_quotes).unwrap_or_default();
        if first.is_empty() {
            return Err(GitError::EmptyOutput {
                operation: "remote url".to_string(),
                path: repo.to_path_buf(),
            });
        }
        Ok(first.trim().to_string())
    }

    fn repo_root(&self, start: &Path) -> Result<PathBuf, GitError> {
        let out = self.run(start, "rev-parse", &["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(out.trim_end_matches('\n')))
    }

    fn ensure_present(
        &self,
        package: &str,
        dest: &Path,
        remote: Option<String>,
    ) -> Result<(), GitError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|source| GitError::Io {
                path: dest.to_path_buf(),
                source,
            })?;
        }
        let url = format!("https://{package}");
        let mut cmd = Command::new("git");
        cmd.arg("clone").arg(&url).arg(dest);
        debug!("running {:?}", cmd);
        let output = cmd.output().map_err(|source| GitError::Spawn {
            path: dest.to_path_buf(),
            source,
        })?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                operation: format!("clone of {url}"),
                path: dest.to_path_buf(),
                output: combined_output(&output.stdout, &output.stderr),
            });
        }
        if let Some(remote) = remote {
            self.add_secondary_remote(dest, &remote)?;
        }
        Ok(())
    }

    fn add_secondary_remote(&self, repo: &Path, url: &str) -> Result<(), GitError> {
        debug!("adding remote {url} to {}", repo.display());
        let mut cmd = Command::new("git");
        cmd.arg("-C")
            .arg(repo)
            .args(["remote", "add", SECONDARY_REMOTE, url]);
        let output = cmd.output().map_err(|source| GitError::Spawn {
            path: repo.to_path_buf(),
            source,
        })?;
        if !output.status.success() {
            let combined = combined_output(&output.stdout, &output.stderr);
            // re-running against an existing checkout is normal
            if !combined.contains("already exists") {
                return Err(GitError::CommandFailed {
                    operation: format!("remote add {SECONDARY_REMOTE}"),
                    path: repo.to_path_buf(),
                    output: combined,
                });
            }
        }
        self.run(repo, "fetch", &["fetch", SECONDARY_REMOTE])?;
        Ok(())
    }

    fn pull_latest(&self, repo: &Path) {
        if let Err(err) = self.run(repo, "checkout", &["checkout", "master"]) {
            warn!("failed to check out primary branch in {}: {err}", repo.display());
        }
        if let Err(err) = self.run(repo, "pull", &["pull"]) {
            warn!("failed to pull {}: {err}", repo.display());
        }
    }
}

fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    let err = String::from_utf8_lossy(stderr);
    if !err.is_empty() {
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&err);
    }
    combined
}

/// Pick the last tag record that has all three fields and is not a
/// pre-release build. Records arrive in ascending sort order, so the last
/// survivor is the latest.
fn select_latest_tag(output: &str) -> Option<(String, String, String)> {
    let mut winner = None;
    for line in output.lines() {
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < 3 {
            continue;
        }
        let name = strip_quotes(fields[2]);
        if name.is_empty() || IGNORED_TAG_MARKERS.iter().any(|m| name.contains(m)) {
            continue;
        }
        winner = Some((strip_quotes(fields[0]), strip_quotes(fields[1]), name));
    }
    winner
}

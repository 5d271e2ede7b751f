use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    /// The git invocation itself could not be spawned.
    #[error("failed to run git in {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// git exited non-zero for an operation that is not tolerated.
    #[error("git {operation} failed for {}: {output}", path.display())]
    CommandFailed {
        operation: String,
        path: PathBuf,
        output: String,
    },

    /// git succeeded but produced nothing usable.
    #[error("no {operation} output for {}", path.display())]
    EmptyOutput { operation: String, path: PathBuf },

    /// Filesystem preparation around a git operation failed.
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No tag survived the ignore-list filtering.
    #[error("no usable release tag found in {}", path.display())]
    NoUsableTag { path: PathBuf },
}

//! Version-control layer
//!
//! - [`client`]: `VcsClient` trait, the read/mutate capability set the
//!   resolver and analyzer consume
//! - [`cli`]: `GitCli`, the system `git` subprocess implementation
//! - [`error`]: `GitError`

pub mod cli;
pub mod client;
pub mod error;

pub use cli::GitCli;
pub use client::{CommitInfo, TagInfo, VcsClient};
pub use error::GitError;

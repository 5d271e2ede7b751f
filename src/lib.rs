//! depfresh library
//!
//! Inspects a pinned-dependency manifest, compares each pin against the
//! latest upstream git state, and optionally rewrites stale pins in place.
//!
//! # Modules
//!
//! - [`config`]: Settings threaded from the CLI (no ambient globals)
//! - [`git`]: Version-control client trait and the system `git` implementation
//! - [`parser`]: Manifest parsing and surgical rewriting (flat and block formats)
//! - [`resolve`]: Per-entry resolution and batch analysis
//! - [`report`]: Aggregate outcome rendering (text / JSON)
//! - [`hooks`]: Optional post-resolution install/build commands
//! - [`util`]: Small shared helpers (quote stripping, hex classification)

pub mod config;
pub mod git;
pub mod hooks;
pub mod parser;
pub mod report;
pub mod resolve;
pub mod util;

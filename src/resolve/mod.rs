//! Resolution layer
//! - resolver.rs: per-entry resolution against a checkout
//! - analyzer.rs: sequential batch driver with fetch/pull preconditions

pub mod analyzer;
pub mod resolver;

pub use analyzer::{AnalyzeError, BatchAnalyzer};
pub use resolver::EntryResolver;

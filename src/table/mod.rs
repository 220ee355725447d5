//! Tabular input and output
//!
//! Classification tables come in through [`MatchSource`]; final ratings go
//! out through the functions in [`sink`].

pub mod sink;
pub mod source;

// Re-export commonly used types
pub use sink::{save_snapshot, write_csv, write_json, SnapshotRow};
pub use source::MatchSource;

//! Command implementations for the `logviz` binary
//!
//! Each command opens what it needs (log file, database), does its work and releases
//! everything before returning, whether it succeeds or fails.

pub mod insert;
pub mod report;
pub mod summary;
#[cfg(feature = "live")]
pub mod view;

pub use insert::run_insert;
pub use report::run_report;
pub use summary::run_summary;
#[cfg(feature = "live")]
pub use view::run_view;

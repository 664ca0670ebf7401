//! logviz Library
//!
//! Parses fixed-layout text logs, stores them in SQLite and charts them.
//!
//! ```text
//! 2024-01-01 12:00:00 - INFO - Service started. (42)
//! ```
//!
//! ## Architecture Overview
//!
//! - [`parser`] - Positional decoding of log lines into [`LogRecord`]s
//! - [`store`] - SQLite `logs` table: one-transaction batch insert and full fetch
//! - [`report`] - In-memory table, level counts, per-level series and their renderers
//! - [`display`] - Colored and JSON level summaries
//! - [`commands`] - The `insert`, `report`, `view` and `summary` commands
//! - [`config`] - Configuration file and environment overrides
//! - [`logging`] - Structured logging setup
//! - [`error`] - Typed errors for each stage
//!
//! ## Example
//!
//! ```rust
//! use logviz::report::{ChartData, LogTable, TimeAxis};
//! use logviz::store::LogStore;
//!
//! # fn example() -> anyhow::Result<()> {
//! let record = logviz::parser::parse_line("2024-01-01 12:00:00 - INFO - Service started. (42)")?;
//!
//! let mut store = LogStore::open_in_memory()?;
//! store.insert_batch(&[record])?;
//!
//! let table = LogTable::from_records(store.fetch_all()?);
//! let chart = ChartData::build(&table, TimeAxis::Time)?;
//! assert_eq!(chart.bars.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod parser;
pub mod report;
pub mod store;
pub mod timestamp_parser;

pub use error::{LineError, ParseError, ReportError, StoreError, UnknownLevel};
pub use models::*;

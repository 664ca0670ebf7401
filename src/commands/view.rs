//! Interactive reporter: chart the logs table (or a log file) in the terminal.

use crate::parser::parse_log_file;
use crate::report::{tui, ChartData, LogTable, TimeAxis};
use crate::store::LogStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Show the charts until the user quits. One snapshot per call.
pub fn run_view(database: &Path, log_file: Option<&Path>, title: &str) -> Result<()> {
    let data = load_chart(database, log_file)?;
    tui::show(&data, title)?;
    Ok(())
}

/// Rows from `log_file` when given, otherwise everything stored in `database`, on the
/// DateTime axis.
pub fn load_chart(database: &Path, log_file: Option<&Path>) -> Result<ChartData> {
    let (records, source) = match log_file {
        Some(path) => (parse_log_file(path)?, path),
        None => {
            let store = LogStore::open(database)?;
            let records = store.fetch_all()?;
            store.close()?;
            (records, database)
        }
    };

    let table = LogTable::from_records(records);
    info!(rows = table.len(), source = %source.display(), "Loaded rows for view");
    ChartData::build(&table, TimeAxis::DateTime)
        .with_context(|| format!("Failed to chart logs from {}", source.display()))
}

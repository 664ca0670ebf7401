//! Batch reporter: chart everything in the database to an image file.

use crate::config::ChartConfig;
use crate::report::{png, ChartData, LogTable, TimeAxis};
use crate::store::LogStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Read all rows from `database` and write the combined figure to `output`.
pub fn run_report(database: &Path, output: &Path, chart: &ChartConfig) -> Result<()> {
    let store = LogStore::open(database)?;
    let records = store.fetch_all()?;
    store.close()?;

    let table = LogTable::from_records(records);
    if table.is_empty() {
        warn!(database = %database.display(), "No log rows stored, writing empty chart");
    }
    let data = ChartData::build(&table, TimeAxis::Time)
        .with_context(|| format!("Failed to chart logs from {}", database.display()))?;
    png::write_png(&data, chart, output)?;

    info!(rows = table.len(), output = %output.display(), "Report completed");
    Ok(())
}

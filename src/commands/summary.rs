//! Level counts straight from the database.

use crate::display::DisplayManager;
use crate::report::LogTable;
use crate::store::LogStore;
use anyhow::Result;
use std::path::Path;

pub fn run_summary(database: &Path, json_output: bool) -> Result<()> {
    let store = LogStore::open(database)?;
    let table = LogTable::from_records(store.fetch_all()?);
    store.close()?;

    DisplayManager::new().display_summary(&table.level_counts(), json_output);
    Ok(())
}

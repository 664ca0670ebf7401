//! Loader: parse a log file and store every record in one batch.

use crate::parser::parse_log_file;
use crate::store::LogStore;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// Parse `log_file` and insert all of its records into the database at `database`.
///
/// Returns the number of rows written. Nothing is written if any line fails to parse or
/// any row fails to insert.
pub fn run_insert(log_file: &Path, database: &Path) -> Result<usize> {
    let records = parse_log_file(log_file)?;

    let mut store = LogStore::open(database)?;
    let inserted = store
        .insert_batch(&records)
        .with_context(|| format!("Failed to store records from {}", log_file.display()))?;
    store.close()?;

    info!(log_file = %log_file.display(), rows = inserted, "Insert completed");
    Ok(inserted)
}

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const SAMPLE_LOG: &str = "\
2024-01-01 12:00:00 - INFO - Service started. (42)
2024-01-01 12:00:05 - DEBUG - Cache warmed. (17)
2024-01-01 12:00:10 - WARNING - Slow response. (88)
2024-01-01 12:00:15 - ERROR - Upstream timeout. (3)
2024-01-01 12:00:20 - INFO - Request served. (51)
2024-01-01 12:00:25 - CRITICAL - Disk full. (99)
";

pub fn create_test_log(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

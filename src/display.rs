//! Output Formatting and Display Management
//!
//! Human-readable terminal output with colors, or structured JSON for programmatic use.
//!
//! ### JSON Output
//! ```json
//! {
//!   "total": 3,
//!   "levels": [
//!     { "level": "INFO", "count": 2 },
//!     { "level": "ERROR", "count": 1 }
//!   ]
//! }
//! ```

use crate::models::Level;
use crate::report::LevelCount;
use colored::{ColoredString, Colorize};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub total: usize,
    pub levels: &'a [LevelCount],
}

pub struct DisplayManager;

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayManager {
    pub fn new() -> Self {
        Self
    }

    pub fn summary_json(&self, counts: &[LevelCount]) -> serde_json::Value {
        let summary = Summary {
            total: counts.iter().map(|c| c.count).sum(),
            levels: counts,
        };
        serde_json::json!(summary)
    }

    pub fn display_summary(&self, counts: &[LevelCount], json_output: bool) {
        if json_output {
            match serde_json::to_string_pretty(&self.summary_json(counts)) {
                Ok(json_str) => println!("{}", json_str),
                Err(e) => eprintln!("Error serializing summary to JSON: {}", e),
            }
            return;
        }

        let total: usize = counts.iter().map(|c| c.count).sum();

        println!("\n{}", "=".repeat(48).bright_cyan());
        println!("{}", "Log Level Summary".bright_white().bold());
        println!("{}", "=".repeat(48).bright_cyan());

        if counts.is_empty() {
            println!("{}", "No log records stored.".yellow());
            return;
        }

        for entry in counts {
            let share = entry.count as f64 * 100.0 / total as f64;
            println!(
                "  {:<10} {:>8} {:>7}",
                paint_level(&entry.level),
                entry.count.to_string().bright_white(),
                format!("{:.1}%", share).dimmed()
            );
        }

        println!("{}", "-".repeat(48).bright_cyan());
        println!("  {:<10} {:>8}", "TOTAL".bold(), total.to_string().bold());
    }
}

/// Level name in its chart color; tokens outside the color table stay uncolored
fn paint_level(level: &str) -> ColoredString {
    match level.parse::<Level>() {
        Ok(known) => {
            let [r, g, b] = known.rgb();
            level.truecolor(r, g, b).bold()
        }
        Err(_) => level.normal(),
    }
}

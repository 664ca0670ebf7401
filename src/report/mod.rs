//! Chart building and rendering
//!
//! Reporting happens in three steps:
//!
//! 1. **Table**: [`LogTable`] holds the rows to chart, minus any stray header rows
//! 2. **Series**: [`ChartData`] resolves levels to colors and builds the bar and line series
//! 3. **Rendering**: [`png`] rasterises the figure to a file, `tui` (feature `live`)
//!    draws it in the terminal
//!
//! ## Figure Layout
//!
//! ```text
//! ┌─ Combined Log Visualizations ───────────────┐
//! │ Distribution of Log Levels                  │
//! │   ██                                        │
//! │   ██  ██      Count by Log Level            │
//! ├──────────────────────────────────────────────┤
//! │ Log Levels Over Time                        │
//! │   ╱╲__╱   one line per level               │
//! │           Random Number by Time            │
//! └──────────────────────────────────────────────┘
//! ```

pub mod png;
#[cfg(feature = "live")]
pub mod tui;

use crate::error::ReportError;
use crate::models::{Level, LogRecord};
use crate::timestamp_parser::TimestampParser;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Value a stray header row carries in its `Date` column
const HEADER_DATE: &str = "Date";

pub const FIGURE_TITLE: &str = "Combined Log Visualizations";
pub const BAR_TITLE: &str = "Distribution of Log Levels";
pub const LINE_TITLE: &str = "Log Levels Over Time";
pub const BAR_X_TITLE: &str = "Log Level";
pub const BAR_Y_TITLE: &str = "Count";
pub const LINE_Y_TITLE: &str = "Random Number";

/// In-memory table of log rows ready for charting.
#[derive(Debug, Clone, Default)]
pub struct LogTable {
    rows: Vec<LogRecord>,
}

impl LogTable {
    /// Build a table, dropping rows whose date is literally `"Date"`.
    pub fn from_records(records: Vec<LogRecord>) -> Self {
        let before = records.len();
        let rows: Vec<LogRecord> = records
            .into_iter()
            .filter(|record| record.date != HEADER_DATE)
            .collect();

        if rows.len() != before {
            warn!(dropped = before - rows.len(), "Dropped header rows from log table");
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[LogRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Frequency of each raw level token, most frequent first.
    /// Ties keep the order in which the levels first appear.
    pub fn level_counts(&self) -> Vec<LevelCount> {
        let mut counts: Vec<LevelCount> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for row in &self.rows {
            match positions.get(row.level.as_str()) {
                Some(&index) => counts[index].count += 1,
                None => {
                    positions.insert(row.level.as_str(), counts.len());
                    counts.push(LevelCount {
                        level: row.level.clone(),
                        count: 1,
                    });
                }
            }
        }

        // Stable sort keeps first-appearance order between equal counts
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: String,
    pub count: usize,
}

/// What the horizontal axis of the line chart measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAxis {
    /// The raw time token, one slot per distinct value in sorted order
    Time,
    /// Date and time combined into an instant, spaced by seconds
    DateTime,
}

impl TimeAxis {
    pub fn title(&self) -> &'static str {
        match self {
            TimeAxis::Time => "Time",
            TimeAxis::DateTime => "DateTime",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    pub level: Level,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSeries {
    pub level: Level,
    pub points: Vec<Point>,
}

/// Everything a renderer needs to draw the two-panel figure.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub axis: TimeAxis,
    pub bars: Vec<Bar>,
    pub lines: Vec<LineSeries>,
}

impl ChartData {
    /// Resolve levels against the color table and build both series.
    ///
    /// An empty table yields no bars and no lines. Fails on the first level outside the
    /// color table and, for [`TimeAxis::DateTime`], on a row whose date and time do not
    /// form a valid instant.
    pub fn build(table: &LogTable, axis: TimeAxis) -> Result<Self, ReportError> {
        let bars = table
            .level_counts()
            .into_iter()
            .map(|entry| -> Result<Bar, ReportError> {
                Ok(Bar {
                    level: entry.level.parse()?,
                    count: entry.count,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let lines = build_lines(table.rows(), axis)?;
        debug!(bars = bars.len(), lines = lines.len(), "Built chart data");

        Ok(Self { axis, bars, lines })
    }

    pub fn max_count(&self) -> usize {
        self.bars.iter().map(|bar| bar.count).max().unwrap_or(0)
    }

    /// Inclusive x range over all line points
    pub fn x_range(&self) -> (i64, i64) {
        min_max(self.points().map(|p| p.x))
    }

    /// Inclusive value range over all line points
    pub fn y_range(&self) -> (i64, i64) {
        min_max(self.points().map(|p| p.value))
    }

    /// Labels of the leftmost and rightmost points
    pub fn x_labels(&self) -> Option<(&str, &str)> {
        let first = self.points().min_by_key(|p| p.x)?;
        let last = self.points().max_by_key(|p| p.x)?;
        Some((first.label.as_str(), last.label.as_str()))
    }

    fn points(&self) -> impl Iterator<Item = &Point> {
        self.lines.iter().flat_map(|line| line.points.iter())
    }
}

fn min_max(values: impl Iterator<Item = i64>) -> (i64, i64) {
    values.fold(None, |acc: Option<(i64, i64)>, v| match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
    })
    .unwrap_or((0, 0))
}

/// Group rows by `(x, level, number)` and split the distinct groups into one series per level.
fn build_lines(rows: &[LogRecord], axis: TimeAxis) -> Result<Vec<LineSeries>, ReportError> {
    let slots: HashMap<&str, i64> = match axis {
        TimeAxis::Time => rows
            .iter()
            .map(|row| row.time.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .enumerate()
            .map(|(index, time)| (time, index as i64))
            .collect(),
        TimeAxis::DateTime => HashMap::new(),
    };

    let mut groups: BTreeSet<(i64, &str, i64, String)> = BTreeSet::new();
    for row in rows {
        let (x, label) = match axis {
            TimeAxis::Time => (slots[row.time.as_str()], row.time.clone()),
            TimeAxis::DateTime => {
                let instant = TimestampParser::parse(&row.date, &row.time).ok_or_else(|| {
                    ReportError::InvalidTimestamp {
                        value: format!("{} {}", row.date, row.time),
                    }
                })?;
                (
                    instant.and_utc().timestamp(),
                    instant.format("%Y-%m-%d %H:%M:%S").to_string(),
                )
            }
        };
        groups.insert((x, row.level.as_str(), row.number, label));
    }

    let mut lines: Vec<LineSeries> = Vec::new();
    for (x, level, value, label) in groups {
        let level: Level = level.parse()?;
        let point = Point { x, label, value };
        match lines.iter_mut().find(|line| line.level == level) {
            Some(line) => line.points.push(point),
            None => lines.push(LineSeries {
                level,
                points: vec![point],
            }),
        }
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, time: &str, level: &str, number: i64) -> LogRecord {
        LogRecord::new(date, time, level, "message", number)
    }

    #[test]
    fn test_header_rows_are_dropped() {
        let table = LogTable::from_records(vec![
            record("Date", "Time", "Level", 0),
            record("2024-01-01", "12:00:00", "INFO", 1),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].level, "INFO");
    }

    #[test]
    fn test_two_levels_two_bars() {
        let table = LogTable::from_records(vec![
            record("2024-01-01", "12:00:00", "INFO", 1),
            record("2024-01-01", "12:00:01", "ERROR", 2),
        ]);
        let chart = ChartData::build(&table, TimeAxis::Time).unwrap();
        assert_eq!(
            chart.bars,
            vec![
                Bar { level: Level::Info, count: 1 },
                Bar { level: Level::Error, count: 1 },
            ]
        );
    }

    #[test]
    fn test_level_counts_most_frequent_first() {
        let table = LogTable::from_records(vec![
            record("2024-01-01", "12:00:00", "INFO", 1),
            record("2024-01-01", "12:00:01", "ERROR", 2),
            record("2024-01-01", "12:00:02", "ERROR", 3),
            record("2024-01-01", "12:00:03", "DEBUG", 4),
        ]);
        let counts: Vec<(String, usize)> = table
            .level_counts()
            .into_iter()
            .map(|c| (c.level, c.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("ERROR".to_string(), 2),
                ("INFO".to_string(), 1),
                ("DEBUG".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_unknown_level_fails_at_chart_time() {
        let table = LogTable::from_records(vec![record("2024-01-01", "12:00:00", "TRACE", 1)]);
        let err = ChartData::build(&table, TimeAxis::Time).unwrap_err();
        assert!(matches!(err, ReportError::UnknownLevel(ref e) if e.0 == "TRACE"));
    }

    #[test]
    fn test_header_only_table_charts_empty() {
        let table = LogTable::from_records(vec![record("Date", "Time", "Level", 0)]);
        let chart = ChartData::build(&table, TimeAxis::DateTime).unwrap();
        assert!(chart.bars.is_empty());
        assert!(chart.lines.is_empty());
        assert_eq!(chart.max_count(), 0);
        assert_eq!(chart.x_range(), (0, 0));
        assert_eq!(chart.x_labels(), None);
    }

    #[test]
    fn test_lines_group_duplicates_and_sort_by_time() {
        let table = LogTable::from_records(vec![
            record("2024-01-01", "12:00:02", "INFO", 7),
            record("2024-01-01", "12:00:00", "INFO", 5),
            record("2024-01-01", "12:00:00", "INFO", 5),
            record("2024-01-01", "12:00:01", "WARNING", 9),
        ]);
        let chart = ChartData::build(&table, TimeAxis::Time).unwrap();

        assert_eq!(chart.lines.len(), 2);
        assert_eq!(chart.lines[0].level, Level::Info);
        let info: Vec<(i64, i64)> = chart.lines[0].points.iter().map(|p| (p.x, p.value)).collect();
        assert_eq!(info, vec![(0, 5), (2, 7)]);
        assert_eq!(chart.lines[1].level, Level::Warning);
        assert_eq!(chart.lines[1].points[0].x, 1);

        assert_eq!(chart.x_range(), (0, 2));
        assert_eq!(chart.y_range(), (5, 9));
        assert_eq!(chart.x_labels(), Some(("12:00:00", "12:00:02")));
    }

    #[test]
    fn test_datetime_axis_spans_days() {
        let table = LogTable::from_records(vec![
            record("2024-01-02", "00:00:00", "ERROR", 1),
            record("2024-01-01", "23:59:59", "ERROR", 2),
        ]);
        let chart = ChartData::build(&table, TimeAxis::DateTime).unwrap();
        let (lo, hi) = chart.x_range();
        assert_eq!(hi - lo, 1);
        assert_eq!(chart.lines[0].points[0].value, 2);
        assert_eq!(chart.x_labels(), Some(("2024-01-01 23:59:59", "2024-01-02 00:00:00")));
    }

    #[test]
    fn test_datetime_axis_rejects_bad_timestamps() {
        let table = LogTable::from_records(vec![record("someday", "12:00:00", "INFO", 1)]);
        assert!(matches!(
            ChartData::build(&table, TimeAxis::DateTime),
            Err(ReportError::InvalidTimestamp { .. })
        ));
    }
}

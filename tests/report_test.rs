use logviz::models::{Level, LogRecord};
use logviz::parser::parse_line;
use logviz::report::{png, Bar, ChartData, LogTable, TimeAxis};
use logviz::config::ChartConfig;
use logviz::store::LogStore;
use logviz::ReportError;
use tempfile::tempdir;

mod common;

#[test]
fn test_two_stored_rows_give_two_bars() -> anyhow::Result<()> {
    let mut store = LogStore::open_in_memory()?;
    store.insert_batch(&[
        LogRecord::new("2024-01-01", "12:00:00", "INFO", "up", 1),
        LogRecord::new("2024-01-01", "12:00:01", "ERROR", "down", 2),
    ])?;

    let table = LogTable::from_records(store.fetch_all()?);
    let chart = ChartData::build(&table, TimeAxis::Time)?;
    assert_eq!(
        chart.bars,
        vec![
            Bar { level: Level::Info, count: 1 },
            Bar { level: Level::Error, count: 1 },
        ]
    );
    Ok(())
}

#[test]
fn test_stray_header_row_is_ignored() -> anyhow::Result<()> {
    let mut store = LogStore::open_in_memory()?;
    store.insert_batch(&[
        LogRecord::new("Date", "Time", "Level", "Message", 0),
        LogRecord::new("2024-01-01", "12:00:00", "INFO", "up", 1),
    ])?;

    let table = LogTable::from_records(store.fetch_all()?);
    assert_eq!(table.len(), 1);
    assert!(ChartData::build(&table, TimeAxis::Time).is_ok());
    Ok(())
}

#[test]
fn test_unknown_level_only_fails_when_charting() -> anyhow::Result<()> {
    let mut store = LogStore::open_in_memory()?;
    let record = logviz::parser::parse_line("2024-01-01 12:00:00 - FATAL - Boom. (1)")?;
    store.insert_batch(&[record])?;

    let table = LogTable::from_records(store.fetch_all()?);
    let err = ChartData::build(&table, TimeAxis::Time).unwrap_err();
    assert!(matches!(err, ReportError::UnknownLevel(_)));
    Ok(())
}

#[test]
fn test_sample_log_renders_to_png() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let log = common::create_test_log(dir.path(), "app.log", common::SAMPLE_LOG)?;
    let table = LogTable::from_records(logviz::parser::parse_log_file(&log)?);

    let chart = ChartData::build(&table, TimeAxis::DateTime)?;
    assert_eq!(chart.bars.len(), 5);
    assert_eq!(chart.lines.len(), 5);

    let output = dir.path().join("chart.png");
    png::write_png(&chart, &ChartConfig::default(), &output)?;
    assert!(output.metadata()?.len() > 0);
    Ok(())
}

#[test]
fn test_numbers_spanning_i64_render() -> anyhow::Result<()> {
    let records = vec![
        parse_line("2024-01-01 12:00:00 - INFO - a. (-9223372036854775808)")?,
        parse_line("2024-01-01 12:00:01 - INFO - b. (9223372036854775807)")?,
    ];
    let chart = ChartData::build(&LogTable::from_records(records), TimeAxis::Time)?;
    assert_eq!(chart.y_range(), (i64::MIN, i64::MAX));

    let image = png::render(&chart, &ChartConfig::default());
    assert_eq!(image.dimensions(), (1000, 800));
    Ok(())
}

//! Log line decoding
//!
//! Lines have exactly one layout:
//!
//! ```text
//! 2024-01-01 12:00:00 - INFO - Service started. (42)
//! ```
//!
//! Decoding is positional. The line is split on `" - "` into the timestamp, the level and
//! the message segment; the message segment is split at its first `". "` into the free text
//! and the parenthesised number, so the text itself cannot contain `". "`; the timestamp is
//! split at its first space. Anything that does not fit is a [`ParseError`] and aborts the
//! file it came from.

use crate::error::{LineError, ParseError};
use crate::models::LogRecord;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

const FIELD_SEPARATOR: &str = " - ";
const NUMBER_SEPARATOR: &str = ". ";

/// Decode one line into a [`LogRecord`].
pub fn parse_line(line: &str) -> Result<LogRecord, ParseError> {
    let segments: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();
    let (timestamp, level, body) = match segments.as_slice() {
        [timestamp, level, body] => (*timestamp, *level, *body),
        short if short.len() < 3 => {
            return Err(ParseError::MissingSegment { found: short.len() })
        }
        long => return Err(ParseError::ExtraSegments { found: long.len() }),
    };

    let (message, number_token) = body
        .trim()
        .split_once(NUMBER_SEPARATOR)
        .ok_or_else(|| ParseError::MissingNumber {
            segment: body.to_string(),
        })?;

    let (date, time) = timestamp
        .trim()
        .split_once(' ')
        .ok_or_else(|| ParseError::MissingTime {
            segment: timestamp.to_string(),
        })?;

    let number = parse_number(number_token)?;

    Ok(LogRecord::new(date, time, level, message, number))
}

/// `(42)` -> 42. Surrounding parentheses are optional, the content must be a base-10 integer,
/// padding inside the parentheses is allowed.
fn parse_number(token: &str) -> Result<i64, ParseError> {
    let digits = token.trim_start_matches('(').trim_end_matches(')').trim();
    digits
        .parse::<i64>()
        .map_err(|source| ParseError::InvalidNumber {
            token: token.to_string(),
            source,
        })
}

/// Decode every line of `reader`, stopping at the first malformed one.
pub fn parse_lines<R: BufRead>(reader: R) -> Result<Vec<LogRecord>> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {line_number}"))?;
        let record = parse_line(&line).map_err(|source| LineError {
            line: line_number,
            source,
        })?;
        debug!(line = line_number, level = %record.level, number = record.number, "Parsed log line");
        records.push(record);
    }

    Ok(records)
}

/// Read and decode a whole log file.
pub fn parse_log_file(path: &Path) -> Result<Vec<LogRecord>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;
    let records = parse_lines(BufReader::new(file))
        .with_context(|| format!("Failed to parse log file: {}", path.display()))?;

    info!(path = %path.display(), records = records.len(), "Parsed log file");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_well_formed_line() {
        let record = parse_line("2024-01-01 12:00:00 - INFO - Service started. (42)").unwrap();
        assert_eq!(record.date, "2024-01-01");
        assert_eq!(record.time, "12:00:00");
        assert_eq!(record.level, "INFO");
        assert_eq!(record.message, "Service started");
        assert_eq!(record.number, 42);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let line = "2024-03-05 08:15:30 - ERROR - Disk quota exceeded. (-7)";
        assert_eq!(parse_line(line), parse_line(line));
        assert_eq!(parse_line(line).unwrap().number, -7);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let record = parse_line("  2024-01-01 12:00:00 - DEBUG - Tick. (1)\r\n").unwrap();
        assert_eq!(record.date, "2024-01-01");
        assert_eq!(record.number, 1);
    }

    #[test]
    fn test_sentence_break_in_message_is_rejected() {
        let err = parse_line("2024-01-01 12:00:00 - WARNING - Retrying. Backoff 2s. (3)").unwrap_err();
        match err {
            ParseError::InvalidNumber { token, .. } => assert_eq!(token, "Backoff 2s. (3)"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_padding_inside_parentheses() {
        assert_eq!(parse_line("2024-01-01 12:00:00 - INFO - Up. ( 42)").unwrap().number, 42);
        assert_eq!(parse_line("2024-01-01 12:00:00 - INFO - Up. (-3 )").unwrap().number, -3);
    }

    #[test]
    fn test_missing_number_separator() {
        let err = parse_line("2024-01-01 12:00:00 - INFO - Service started (42)").unwrap_err();
        assert!(matches!(err, ParseError::MissingNumber { .. }));
    }

    #[test]
    fn test_non_digit_parenthetical() {
        let err = parse_line("2024-01-01 12:00:00 - INFO - Service started. (4x2)").unwrap_err();
        match err {
            ParseError::InvalidNumber { token, .. } => assert_eq!(token, "(4x2)"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_segments() {
        assert_eq!(
            parse_line("2024-01-01 12:00:00 - INFO"),
            Err(ParseError::MissingSegment { found: 2 })
        );
        assert_eq!(parse_line(""), Err(ParseError::MissingSegment { found: 1 }));
    }

    #[test]
    fn test_extra_segments_are_rejected() {
        let err = parse_line("2024-01-01 12:00:00 - INFO - a - b. (1)").unwrap_err();
        assert_eq!(err, ParseError::ExtraSegments { found: 4 });
    }

    #[test]
    fn test_missing_time() {
        let err = parse_line("2024-01-01T12:00:00 - INFO - Up. (1)").unwrap_err();
        assert!(matches!(err, ParseError::MissingTime { .. }));
    }

    #[test]
    fn test_unknown_level_is_accepted_by_the_parser() {
        let record = parse_line("2024-01-01 12:00:00 - TRACE - Noise. (0)").unwrap();
        assert_eq!(record.level, "TRACE");
    }

    #[test]
    fn test_parse_lines_reports_line_number() {
        let input = "2024-01-01 12:00:00 - INFO - ok. (1)\n\n2024-01-01 12:00:01 - INFO - ok. (2)\n";
        let err = parse_lines(Cursor::new(input)).unwrap_err();
        let line_error = err.downcast_ref::<LineError>().unwrap();
        assert_eq!(line_error.line, 2);
        assert_eq!(line_error.source, ParseError::MissingSegment { found: 1 });
    }

    #[test]
    fn test_parse_lines_keeps_order() {
        let input = "2024-01-01 12:00:00 - INFO - a. (1)\n2024-01-01 12:00:01 - ERROR - b. (2)";
        let records = parse_lines(Cursor::new(input)).unwrap();
        let levels: Vec<_> = records.iter().map(|r| r.level.as_str()).collect();
        assert_eq!(levels, ["INFO", "ERROR"]);
    }
}

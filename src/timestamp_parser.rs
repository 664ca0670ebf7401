use chrono::{NaiveDate, NaiveDateTime};

/// Handles parsing the date and time tokens of a log line into a single instant
pub struct TimestampParser;

impl TimestampParser {
    const FORMATS: [&'static str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S,%3f", "%Y-%m-%d %H:%M"];

    /// Combine `date` and `time` into a naive datetime.
    /// Accepts fractional seconds with `.` or `,` and times without seconds.
    pub fn parse(date: &str, time: &str) -> Option<NaiveDateTime> {
        let combined = format!("{} {}", date.trim(), time.trim());

        for format in Self::FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(&combined, format) {
                return Some(parsed);
            }
        }

        // A bare date charts at midnight
        if time.trim().is_empty() {
            return NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0));
        }

        None
    }
}

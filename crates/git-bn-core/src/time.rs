//! Timestamp helpers.
//!
//! Note timestamps are stored as `YYYY-MM-DD HH:MM:SS` in local time so the
//! store file stays readable and sorts lexicographically.

use chrono::{DateTime, Local, Utc};

/// Format used for every timestamp written to the note store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format git emits for `%ci` (committer date, ISO-like).
const GIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Current local time in store format.
pub fn now_timestamp() -> String {
    format_local(&Local::now())
}

/// Format a local datetime in store format.
pub fn format_local(dt: &DateTime<Local>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Convert a git `%ci` date into `YYYY-MM-DD HH:MM:SS` UTC.
pub fn parse_commit_date(raw: &str) -> Option<String> {
    DateTime::parse_from_str(raw.trim(), GIT_DATE_FORMAT)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string())
}

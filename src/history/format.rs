//! Rendering of commit timestamps in history output.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Turns a ledger commit time into the `Timestamp` text of a history entry.
///
/// Any `Fn(&DateTime<Utc>) -> String` is a formatter, so callers can plug in
/// their own rendering:
///
/// ```
/// use chrono::DateTime;
/// use vlm::history::TimestampFormatter;
///
/// let day_only = |ts: &DateTime<chrono::Utc>| ts.format("%Y-%m-%d").to_string();
/// let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
/// assert_eq!(day_only.format(&ts), "2023-11-14");
/// ```
pub trait TimestampFormatter: Send + Sync {
    fn format(&self, timestamp: &DateTime<Utc>) -> String;
}

impl<F> TimestampFormatter for F
where
    F: Fn(&DateTime<Utc>) -> String + Send + Sync,
{
    fn format(&self, timestamp: &DateTime<Utc>) -> String {
        self(timestamp)
    }
}

/// Built-in renderings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// `2023-11-14 22:13:20.5 +0000 UTC`, the text existing history consumers parse.
    #[default]
    Ledger,
    /// `2023-11-14T22:13:20.500Z`
    Rfc3339,
    /// Whole seconds since the Unix epoch.
    EpochSeconds,
    /// Milliseconds since the Unix epoch.
    EpochMillis,
}

impl TimestampFormatter for TimestampFormat {
    fn format(&self, timestamp: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Ledger => ledger_text(timestamp),
            TimestampFormat::Rfc3339 => timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            TimestampFormat::EpochSeconds => timestamp.timestamp().to_string(),
            TimestampFormat::EpochMillis => timestamp.timestamp_millis().to_string(),
        }
    }
}

/// Fraction carries only its significant digits and is omitted when zero.
fn ledger_text(timestamp: &DateTime<Utc>) -> String {
    let fraction = timestamp.format("%.9f").to_string();
    let fraction = fraction.trim_end_matches('0').trim_end_matches('.');
    format!(
        "{}{} {}",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        fraction,
        timestamp.format("%z UTC")
    )
}

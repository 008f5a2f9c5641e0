//! Time windows for volume requests.
//!
//! Timestamps travel as RFC3339 strings. A window is parsed once, normalized to
//! UTC and guaranteed to end strictly after it starts.

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeWindowError {
    #[error("invalid RFC3339 timestamp {value:?}: {reason}")]
    Parse { value: String, reason: String },
    #[error("end time must be after start time")]
    EndNotAfterStart,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeWindowError> {
        if end <= start {
            return Err(TimeWindowError::EndNotAfterStart);
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, TimeWindowError> {
        Self::new(parse_rfc3339(start)?, parse_rfc3339(end)?)
    }

    /// Window starting now and lasting `minutes`.
    pub fn starting_now(minutes: i64) -> Result<Self, TimeWindowError> {
        let start = Utc::now();
        Self::new(start, start + chrono::Duration::minutes(minutes))
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, TimeWindowError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| TimeWindowError::Parse {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Date format used by the two date-input controls.
pub const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// 2021-02-01T00:00:00Z
const DEFAULT_START_MS: i64 = 1_612_137_600_000;
/// 2021-02-07T00:00:00Z
const DEFAULT_END_MS: i64 = 1_612_656_000_000;

/// The inclusive start/end window used to filter records client-side.
///
/// Replaced wholesale on every edit; there is no in-place mutation.
/// No `start <= end` check is made: an inverted range is legal and simply
/// matches no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A partial replacement of a [`DateRange`] coming from one date input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEdit {
    Start(DateTime<Utc>),
    End(DateTime<Utc>),
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Range spanning midnight UTC of `start` to midnight UTC of `end`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(midnight_utc(start), midnight_utc(end))
    }

    #[must_use]
    pub fn with_start(self, start: DateTime<Utc>) -> Self {
        Self { start, ..self }
    }

    #[must_use]
    pub fn with_end(self, end: DateTime<Utc>) -> Self {
        Self { end, ..self }
    }

    #[must_use]
    pub fn apply(self, edit: RangeEdit) -> Self {
        match edit {
            RangeEdit::Start(start) => self.with_start(start),
            RangeEdit::End(end) => self.with_end(end),
        }
    }

    pub fn start_millis(&self) -> i64 {
        self.start.timestamp_millis()
    }

    pub fn end_millis(&self) -> i64 {
        self.end.timestamp_millis()
    }

    /// Inclusive on both ends.
    pub fn contains_millis(&self, timestamp: i64) -> bool {
        self.start_millis() <= timestamp && timestamp <= self.end_millis()
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Values for the `From` / `To` date inputs.
    pub fn to_inputs(&self) -> (String, String) {
        (
            self.start.format(DATE_INPUT_FORMAT).to_string(),
            self.end.format(DATE_INPUT_FORMAT).to_string(),
        )
    }
}

impl Default for DateRange {
    /// 2021-02-01 .. 2021-02-07, the window shown before any user edit.
    fn default() -> Self {
        Self {
            start: DateTime::from_timestamp_millis(DEFAULT_START_MS).unwrap_or_default(),
            end: DateTime::from_timestamp_millis(DEFAULT_END_MS).unwrap_or_default(),
        }
    }
}

impl RangeEdit {
    pub fn start_from_input(input: &str) -> Result<Self, CoreError> {
        parse_date_input(input).map(RangeEdit::Start)
    }

    pub fn end_from_input(input: &str) -> Result<Self, CoreError> {
        parse_date_input(input).map(RangeEdit::End)
    }
}

/// Parse an ISO `YYYY-MM-DD` date input as midnight UTC.
pub fn parse_date_input(input: &str) -> Result<DateTime<Utc>, CoreError> {
    NaiveDate::parse_from_str(input.trim(), DATE_INPUT_FORMAT)
        .map(midnight_utc)
        .map_err(|_| CoreError::InvalidDateInput(input.to_string()))
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

use chrono::DateTime;

use crate::errors::CoreError;
use crate::models::range::DateRange;
use crate::models::record::{RawRecord, SleepPayload};
use crate::models::series::ChartSeries;

/// Month/day label format, e.g. "Feb 3".
const LABEL_FORMAT: &str = "%b %-d";

/// Turns raw API records into chart-ready series.
///
/// Steps, in order:
/// 1. Keep records whose timestamp lies in the range (inclusive both ends)
/// 2. Sort ascending by timestamp
/// 3. Decode each payload and pair its `sleep_duration` with a day label
///
/// A single undecodable payload fails the whole run; no partial series is
/// ever returned.
pub struct PipelineService;

impl PipelineService {
    pub fn new() -> Self {
        Self
    }

    pub fn build_series(
        &self,
        records: &[RawRecord],
        range: &DateRange,
    ) -> Result<ChartSeries, CoreError> {
        let selected = self.filter_sorted(records, range);

        let mut series = ChartSeries::with_capacity(selected.len());
        for record in selected {
            let payload = decode_payload(record)?;
            let label = format_label(record.timestamp)?;
            series.push(payload.sleep_duration, label);
        }

        tracing::debug!(
            received = records.len(),
            plotted = series.len(),
            "built sleep series"
        );
        Ok(series)
    }

    /// Records inside `range`, oldest first. Equal timestamps keep their
    /// input order.
    pub fn filter_sorted<'a>(&self, records: &'a [RawRecord], range: &DateRange) -> Vec<&'a RawRecord> {
        let mut selected: Vec<&RawRecord> = records
            .iter()
            .filter(|r| range.contains_millis(r.timestamp))
            .collect();
        selected.sort_by_key(|r| r.timestamp);
        selected
    }
}

impl Default for PipelineService {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a record's single-quoted payload, e.g. `{'sleep_duration': 7.5}`.
///
/// Every `'` becomes `"` before JSON parsing, so apostrophes inside string
/// values are not supported.
pub fn decode_payload(record: &RawRecord) -> Result<SleepPayload, CoreError> {
    let json = record.payload.replace('\'', "\"");
    serde_json::from_str(&json).map_err(|e| CoreError::PayloadDecode {
        record_id: record.id,
        message: e.to_string(),
    })
}

/// Calendar-day label for an epoch-ms timestamp, in UTC.
pub fn format_label(timestamp: i64) -> Result<String, CoreError> {
    DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.format(LABEL_FORMAT).to_string())
        .ok_or(CoreError::InvalidTimestamp(timestamp))
}

use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::range::DateRange;
use crate::models::record::RawRecord;
use crate::models::settings::Settings;

/// Server-side `startdate`/`enddate` pair sent with a request (epoch ms).
///
/// This is independent of the client-side [`DateRange`] filter unless
/// [`Settings::sync_query_with_range`] is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl QueryWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// The window to request for `range` under `settings`.
    pub fn for_range(settings: &Settings, range: &DateRange) -> Self {
        if settings.sync_query_with_range {
            Self::new(range.start_millis(), range.end_millis())
        } else {
            Self::new(settings.query_start_ms, settings.query_end_ms)
        }
    }
}

/// Source of raw sleep records.
///
/// The HTTP endpoint implements this; tests and hosts can substitute
/// anything else that yields a record array.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SleepDataSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Retrieve the full, unfiltered record collection for `window`.
    async fn fetch_records(&self, window: QueryWindow) -> Result<Vec<RawRecord>, CoreError>;
}

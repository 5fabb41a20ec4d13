use crate::errors::CoreError;
use crate::models::record::RawRecord;
use crate::providers::traits::{QueryWindow, SleepDataSource};

/// Retrieves raw records from a [`SleepDataSource`] with bounded retries.
///
/// Only transport and HTTP-status failures are retried; a malformed body
/// is returned immediately since asking again yields the same bytes.
pub struct FetchService {
    source: Box<dyn SleepDataSource>,
    retry_attempts: u32,
}

impl FetchService {
    pub fn new(source: Box<dyn SleepDataSource>, retry_attempts: u32) -> Self {
        Self {
            source,
            retry_attempts,
        }
    }

    /// Name of the underlying source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn fetch(&self, window: QueryWindow) -> Result<Vec<RawRecord>, CoreError> {
        let mut attempt = 0;
        loop {
            tracing::debug!(
                source = self.source.name(),
                start_ms = window.start_ms,
                end_ms = window.end_ms,
                attempt,
                "fetching sleep records"
            );

            match self.source.fetch_records(window).await {
                Ok(records) => {
                    tracing::debug!(count = records.len(), "received sleep records");
                    return Ok(records);
                }
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    tracing::warn!(
                        source = self.source.name(),
                        attempt,
                        error = %e,
                        "sleep record fetch failed, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

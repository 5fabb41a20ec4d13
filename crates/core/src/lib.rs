pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use models::{
    chart::ChartView,
    range::{DateRange, RangeEdit},
    series::ChartSeries,
    settings::Settings,
    summary::SleepSummary,
};
use providers::{
    kaisens::KaisensSleepApi,
    traits::{QueryWindow, SleepDataSource},
};
use services::{
    chart_service::ChartService, fetch_service::FetchService,
    pipeline_service::PipelineService, summary_service::SummaryService,
};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use errors::CoreError;

/// Result of one refresh that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The new series replaced the displayed one.
    Applied { request: u64, points: usize },

    /// A newer refresh started while this one was in flight; its result
    /// (data or error) was discarded.
    Superseded { request: u64, latest: u64 },
}

/// Main entry point for the sleep chart core library.
///
/// Owns two independently replaced slots, the selected [`DateRange`] and the
/// displayed [`ChartSeries`], plus the services that connect them. Every
/// range change triggers one fetch; completions carry a request number and
/// only the most recently started request may replace the series.
#[must_use]
pub struct SleepChart {
    settings: Settings,
    fetch_service: FetchService,
    pipeline_service: PipelineService,
    summary_service: SummaryService,
    chart_service: ChartService,
    range: Mutex<DateRange>,
    series: Mutex<Arc<ChartSeries>>,
    last_error: Mutex<Option<String>>,
    latest_request: AtomicU64,
}

impl std::fmt::Debug for SleepChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SleepChart")
            .field("source", &self.fetch_service.source_name())
            .field("range", &*lock(&self.range))
            .field("points", &lock(&self.series).len())
            .field("latest_request", &self.latest_request.load(Ordering::SeqCst))
            .finish()
    }
}

impl SleepChart {
    /// Create a chart backed by the HTTP sleep API described by `settings`.
    pub fn new(settings: Settings) -> Result<Self, CoreError> {
        let source = KaisensSleepApi::new(&settings)?;
        Self::with_source(settings, Box::new(source))
    }

    /// Create a chart backed by any record source.
    pub fn with_source(
        settings: Settings,
        source: Box<dyn SleepDataSource>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        Ok(Self {
            fetch_service: FetchService::new(source, settings.retry_attempts),
            pipeline_service: PipelineService::new(),
            summary_service: SummaryService::new(),
            chart_service: ChartService::new(&settings),
            range: Mutex::new(DateRange::default()),
            series: Mutex::new(Arc::new(ChartSeries::new())),
            last_error: Mutex::new(None),
            latest_request: AtomicU64::new(0),
            settings,
        })
    }

    /// Start from `range` instead of the default window. No fetch happens
    /// until [`refresh`](Self::refresh) or a range update.
    pub fn with_range(self, range: DateRange) -> Self {
        *lock(&self.range) = range;
        self
    }

    // ── Range ───────────────────────────────────────────────────────

    #[must_use]
    pub fn range(&self) -> DateRange {
        *lock(&self.range)
    }

    // The methods below swap the range and take a request number as soon as
    // they are called; only the fetch waits for the returned future. An edit
    // whose future is dropped still replaces the range.

    /// Replace one end of the range and refetch.
    pub fn update_range(
        &self,
        edit: RangeEdit,
    ) -> impl Future<Output = Result<RefreshOutcome, CoreError>> + '_ {
        let (range, request) = self.replace_range(|current| current.apply(edit));
        self.run(range, request)
    }

    /// Replace the whole range and refetch.
    pub fn set_range(
        &self,
        range: DateRange,
    ) -> impl Future<Output = Result<RefreshOutcome, CoreError>> + '_ {
        let (range, request) = self.replace_range(|_| range);
        self.run(range, request)
    }

    /// Handle a change of the `From` date input (`YYYY-MM-DD`).
    /// Malformed input leaves the range untouched and starts no fetch.
    pub fn set_start_input(
        &self,
        input: &str,
    ) -> impl Future<Output = Result<RefreshOutcome, CoreError>> + '_ {
        let scheduled = RangeEdit::start_from_input(input)
            .map(|edit| self.replace_range(|current| current.apply(edit)));
        self.run_scheduled(scheduled)
    }

    /// Handle a change of the `To` date input (`YYYY-MM-DD`).
    pub fn set_end_input(
        &self,
        input: &str,
    ) -> impl Future<Output = Result<RefreshOutcome, CoreError>> + '_ {
        let scheduled = RangeEdit::end_from_input(input)
            .map(|edit| self.replace_range(|current| current.apply(edit)));
        self.run_scheduled(scheduled)
    }

    /// Refetch for the current range (initial load).
    pub fn refresh(&self) -> impl Future<Output = Result<RefreshOutcome, CoreError>> + '_ {
        let (range, request) = self.replace_range(|current| current);
        self.run(range, request)
    }

    // ── Presentation ────────────────────────────────────────────────

    /// The displayed series. A new `Arc` is handed out after every applied
    /// refresh, so `Arc::ptr_eq` tells callers whether data changed.
    #[must_use]
    pub fn series(&self) -> Arc<ChartSeries> {
        Arc::clone(&lock(&self.series))
    }

    #[must_use]
    pub fn summary(&self) -> SleepSummary {
        self.summary_service.summarize(&self.series())
    }

    /// Message of the last failed refresh, if the latest one failed.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        lock(&self.last_error).clone()
    }

    #[must_use]
    pub fn view(&self) -> ChartView {
        let series = self.series();
        ChartView {
            chart: self.chart_service.chart_spec(&series),
            summary: self.summary_service.summarize(&series),
            inputs: self.chart_service.date_inputs(&self.range()),
            error: self.last_error(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of the most recently started refresh (0 before the first).
    #[must_use]
    pub fn latest_request(&self) -> u64 {
        self.latest_request.load(Ordering::SeqCst)
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Swap the range slot and take a request number under the same lock,
    /// so range order and request order always agree.
    fn replace_range(&self, f: impl FnOnce(DateRange) -> DateRange) -> (DateRange, u64) {
        let mut slot = lock(&self.range);
        let range = f(*slot);
        *slot = range;
        let request = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        (range, request)
    }

    async fn run_scheduled(
        &self,
        scheduled: Result<(DateRange, u64), CoreError>,
    ) -> Result<RefreshOutcome, CoreError> {
        let (range, request) = scheduled?;
        self.run(range, request).await
    }

    async fn run(&self, range: DateRange, request: u64) -> Result<RefreshOutcome, CoreError> {
        if range.is_inverted() {
            tracing::debug!(request, "date range is inverted; series will be empty");
        }

        let window = QueryWindow::for_range(&self.settings, &range);
        let result = self
            .fetch_service
            .fetch(window)
            .await
            .and_then(|records| self.pipeline_service.build_series(&records, &range));

        // Check-and-swap under the series lock so a stale completion can never
        // land between the check and the write.
        let mut slot = lock(&self.series);
        let latest = self.latest_request.load(Ordering::SeqCst);
        if request != latest {
            tracing::warn!(request, latest, "discarding superseded sleep refresh");
            return Ok(RefreshOutcome::Superseded { request, latest });
        }

        match result {
            Ok(series) => {
                let points = series.len();
                *slot = Arc::new(series);
                *lock(&self.last_error) = None;
                tracing::info!(request, points, "sleep series updated");
                Ok(RefreshOutcome::Applied { request, points })
            }
            Err(e) => {
                tracing::warn!(request, error = %e, "sleep refresh failed; keeping previous series");
                *lock(&self.last_error) = Some(e.to_string());
                Err(e)
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

use crate::models::series::ChartSeries;
use crate::models::summary::SleepSummary;

/// Computes the "last night" and "average" statistics shown under the chart.
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: an empty series yields `last_value: None` and a NaN average.
    pub fn summarize(&self, series: &ChartSeries) -> SleepSummary {
        let values = series.values();
        let sum: f64 = values.iter().sum();

        SleepSummary {
            last_value: values.last().copied(),
            // 0.0 / 0.0 is NaN for an empty series
            average: sum / values.len() as f64,
            count: values.len(),
        }
    }
}

impl Default for SummaryService {
    fn default() -> Self {
        Self::new()
    }
}

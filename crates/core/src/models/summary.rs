use serde::Serialize;

/// Display statistics derived from a [`ChartSeries`](super::series::ChartSeries).
///
/// Empty series are not an error: `last_value` is `None` and `average` is NaN,
/// and both are shown as-is.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SleepSummary {
    /// Duration of the most recent night in the series.
    pub last_value: Option<f64>,

    /// Arithmetic mean of the series (NaN when empty).
    pub average: f64,

    /// Number of nights the statistics were computed over.
    pub count: usize,
}

impl SleepSummary {
    /// "Last Night Sleep Duration" text, e.g. `7.5 Hours` or `undefined Hours`.
    pub fn last_value_display(&self) -> String {
        match self.last_value {
            Some(v) => format!("{v} Hours"),
            None => "undefined Hours".to_string(),
        }
    }

    /// "Average Sleep Duration" text with two decimals, e.g. `7.00 Hours` or `NaN Hours`.
    /// Exact halves round away from zero (`7.125` shows as `7.13`).
    pub fn average_display(&self) -> String {
        format!("{:.2} Hours", round_half_away_2(self.average))
    }
}

/// `{:.2}` already rounds the exact binary value correctly but breaks exact
/// ties to even. A value with an exact tie in the third decimal is always a
/// multiple of 1/8, and for those `x * 100.0` is exact, so `round` is safe.
fn round_half_away_2(x: f64) -> f64 {
    if (x * 8.0).fract() == 0.0 {
        (x * 100.0).round() / 100.0
    } else {
        x
    }
}

use serde::{Deserialize, Serialize};

use super::summary::SleepSummary;

/// One named data series handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeriesSpec {
    pub name: String,
    pub data: Vec<f64>,
}

/// Everything the bar-chart renderer needs.
///
/// The core computes all the numbers; the frontend only renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    /// Always `"bar"`.
    pub chart_type: String,

    /// Pixel height of the chart area.
    pub height: u32,

    /// X-axis category labels, index-aligned with every series' `data`.
    pub categories: Vec<String>,

    pub series: Vec<ChartSeriesSpec>,

    pub y_axis_min: f64,
    pub y_axis_max: f64,

    /// Unit appended to tooltip values (`"7.5 hours"`).
    pub tooltip_unit: String,
}

/// Values for the `From` / `To` date inputs, formatted `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInputs {
    pub start: String,
    pub end: String,
}

/// A complete snapshot of what the component displays.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub chart: ChartSpec,
    pub summary: SleepSummary,
    pub inputs: DateInputs,

    /// Message of the last failed refresh, cleared by the next success.
    pub error: Option<String>,
}

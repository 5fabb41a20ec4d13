use crate::models::chart::{ChartSeriesSpec, ChartSpec, DateInputs};
use crate::models::range::DateRange;
use crate::models::series::ChartSeries;
use crate::models::settings::Settings;

const CHART_TYPE: &str = "bar";
const TOOLTIP_UNIT: &str = "hours";

/// Builds the render contract for the bar chart and the two date inputs.
///
/// The output is a plain description; no rendering happens here.
pub struct ChartService {
    series_name: String,
    height: u32,
    y_axis_min: f64,
    y_axis_max: f64,
}

impl ChartService {
    pub fn new(settings: &Settings) -> Self {
        Self {
            series_name: settings.series_name.clone(),
            height: settings.chart_height,
            y_axis_min: settings.y_axis_min,
            y_axis_max: settings.y_axis_max,
        }
    }

    /// Chart description for `series`. An empty series produces an empty
    /// chart, never an error.
    pub fn chart_spec(&self, series: &ChartSeries) -> ChartSpec {
        ChartSpec {
            chart_type: CHART_TYPE.to_string(),
            height: self.height,
            categories: series.labels().to_vec(),
            series: vec![ChartSeriesSpec {
                name: self.series_name.clone(),
                data: series.values().to_vec(),
            }],
            y_axis_min: self.y_axis_min,
            y_axis_max: self.y_axis_max,
            tooltip_unit: TOOLTIP_UNIT.to_string(),
        }
    }

    pub fn date_inputs(&self, range: &DateRange) -> DateInputs {
        let (start, end) = range.to_inputs();
        DateInputs { start, end }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

use crate::errors::CoreError;

/// Component configuration. Every field has a default, so a partial JSON
/// document (or none at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scheme, host and port of the sleep-data API, without a trailing slash.
    pub base_url: String,

    /// The single device whose telemetry is charted.
    pub device_id: Uuid,

    /// `startdate` query value (epoch ms) sent to the server.
    pub query_start_ms: i64,

    /// `enddate` query value (epoch ms) sent to the server.
    pub query_end_ms: i64,

    /// When `true`, `startdate`/`enddate` follow the selected date range
    /// instead of the fixed `query_start_ms`/`query_end_ms` window.
    pub sync_query_with_range: bool,

    /// Per-request timeout in seconds (ignored on wasm32).
    pub request_timeout_secs: u64,

    /// Extra attempts after a transport or HTTP-status failure.
    pub retry_attempts: u32,

    /// Legend name of the plotted series.
    pub series_name: String,

    pub chart_height: u32,
    pub y_axis_min: f64,
    pub y_axis_max: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://prod.kaisens.fr:811".to_string(),
            device_id: Uuid::from_u128(0x93debd97_6564_454b_be33_35bd377a2563),
            query_start_ms: 1_612_310_400_000,
            query_end_ms: 1_614_729_600_000,
            sync_query_with_range: false,
            request_timeout_secs: 30,
            retry_attempts: 0,
            series_name: "Sleep Duration".to_string(),
            chart_height: 320,
            y_axis_min: 0.0,
            y_axis_max: 15.0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::InvalidSettings("base_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::InvalidSettings(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.y_axis_min.partial_cmp(&self.y_axis_max) != Some(Ordering::Less) {
            return Err(CoreError::InvalidSettings(format!(
                "y_axis_min ({}) must be below y_axis_max ({})",
                self.y_axis_min, self.y_axis_max
            )));
        }
        Ok(())
    }
}

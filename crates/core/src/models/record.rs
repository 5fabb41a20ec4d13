use serde::{Deserialize, Serialize};

/// One raw telemetry entry returned by the sleep-data endpoint.
///
/// Field names follow the endpoint's wire format (`_id`, `data`,
/// `device_id`); the camelCase names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: i64,

    /// Serialized object using single quotes, e.g. `{'sleep_duration': 7.5}`.
    #[serde(rename = "data", alias = "payload")]
    pub payload: String,

    #[serde(rename = "device_id", alias = "deviceId")]
    pub device_id: String,

    /// Epoch milliseconds (UTC).
    pub timestamp: i64,
}

impl RawRecord {
    pub fn new(id: i64, payload: impl Into<String>, device_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id,
            payload: payload.into(),
            device_id: device_id.into(),
            timestamp,
        }
    }
}

/// The decoded `payload` of a [`RawRecord`]. Extra fields are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepPayload {
    /// Hours slept.
    pub sleep_duration: f64,
}

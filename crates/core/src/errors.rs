use thiserror::Error;

/// Unified error type for the entire sleep-chart-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Pipeline ────────────────────────────────────────────────────
    #[error("Failed to decode payload of record {record_id}: {message}")]
    PayloadDecode { record_id: i64, message: String },

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    // ── Input / Configuration ───────────────────────────────────────
    #[error("Invalid date input '{0}': expected YYYY-MM-DD")]
    InvalidDateInput(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; the query string holds the
        // device id, so strip it before the message reaches logs or the UI.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl CoreError {
    /// Whether another attempt at the same request could succeed.
    /// Only transport and HTTP-status failures qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Network(_) | CoreError::Api { .. })
    }
}

use async_trait::async_trait;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::record::RawRecord;
use crate::models::settings::Settings;
use super::traits::{QueryWindow, SleepDataSource};

const PROVIDER_NAME: &str = "Kaisens";

/// Sleep telemetry API serving one JSON array per device.
///
/// - **Endpoint**: `GET /api/sleep/?deviceid=..&enddate=..&startdate=..&format=json`
/// - **Auth**: none
/// - **Response**: `[{"_id", "data", "device_id", "timestamp"}, ...]`
///
/// The server does not sort its response and may return records outside
/// the requested window; filtering happens client-side.
pub struct KaisensSleepApi {
    client: Client,
    base_url: String,
    device_id: Uuid,
}

impl KaisensSleepApi {
    /// Fails if the HTTP client cannot be built (e.g. no TLS backend).
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        let client = builder.build().map_err(|e| {
            CoreError::InvalidSettings(format!("cannot build HTTP client: {e}"))
        })?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            device_id: settings.device_id,
        })
    }

    /// Full request URL for `window`.
    pub fn url_for(&self, window: QueryWindow) -> String {
        format!(
            "{}/api/sleep/?deviceid={}&enddate={}&startdate={}&format=json",
            self.base_url, self.device_id, window.end_ms, window.start_ms
        )
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SleepDataSource for KaisensSleepApi {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_records(&self, window: QueryWindow) -> Result<Vec<RawRecord>, CoreError> {
        let url = self.url_for(window);

        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("HTTP {status} from sleep endpoint"),
            });
        }

        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            CoreError::Deserialization(format!("{PROVIDER_NAME} response is not a record array: {e}"))
        })
    }
}

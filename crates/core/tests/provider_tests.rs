// ═══════════════════════════════════════════════════════════════════
// Provider Tests — QueryWindow, KaisensSleepApi, FetchService retries
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use sleep_chart_core::errors::CoreError;
use sleep_chart_core::models::range::DateRange;
use sleep_chart_core::models::record::RawRecord;
use sleep_chart_core::models::settings::Settings;
use sleep_chart_core::providers::kaisens::KaisensSleepApi;
use sleep_chart_core::providers::traits::{QueryWindow, SleepDataSource};
use sleep_chart_core::services::fetch_service::FetchService;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Serve exactly one HTTP response on a random local port.
/// Returns the base URL and a receiver for the request line.
async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        let request = String::from_utf8_lossy(&buf);
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    (format!("http://{addr}"), rx)
}

fn settings_for(base_url: String) -> Settings {
    Settings {
        base_url,
        request_timeout_secs: 5,
        ..Settings::default()
    }
}

/// Fails with the given error `failures` times, then returns one record.
struct FlakySource {
    failures: u32,
    calls: Arc<AtomicU32>,
    error: fn() -> CoreError,
}

#[async_trait]
impl SleepDataSource for FlakySource {
    fn name(&self) -> &str {
        "Flaky"
    }

    async fn fetch_records(&self, _window: QueryWindow) -> Result<Vec<RawRecord>, CoreError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err((self.error)())
        } else {
            Ok(vec![RawRecord::new(1, "{'sleep_duration': 7}", "dev", 0)])
        }
    }
}

fn network_error() -> CoreError {
    CoreError::Network("connection reset".into())
}

fn body_error() -> CoreError {
    CoreError::Deserialization("not an array".into())
}

// ═══════════════════════════════════════════════════════════════════
// QueryWindow
// ═══════════════════════════════════════════════════════════════════

mod query_window {
    use super::*;

    #[test]
    fn static_window_ignores_selected_range() {
        let settings = Settings::default();
        let range = DateRange::from_dates(make_date(2020, 1, 1), make_date(2020, 1, 2));
        let window = QueryWindow::for_range(&settings, &range);
        assert_eq!(window, QueryWindow::new(1_612_310_400_000, 1_614_729_600_000));
    }

    #[test]
    fn synced_window_follows_selected_range() {
        let settings = Settings {
            sync_query_with_range: true,
            ..Settings::default()
        };
        let range = DateRange::from_dates(make_date(2021, 2, 1), make_date(2021, 2, 7));
        let window = QueryWindow::for_range(&settings, &range);
        assert_eq!(window.start_ms, range.start_millis());
        assert_eq!(window.end_ms, range.end_millis());
    }
}

// ═══════════════════════════════════════════════════════════════════
// KaisensSleepApi
// ═══════════════════════════════════════════════════════════════════

mod kaisens {
    use super::*;

    #[test]
    fn name() {
        let api = KaisensSleepApi::new(&Settings::default()).unwrap();
        assert_eq!(api.name(), "Kaisens");
    }

    #[test]
    fn url_for_default_settings() {
        let api = KaisensSleepApi::new(&Settings::default()).unwrap();
        let url = api.url_for(QueryWindow::new(1_612_310_400_000, 1_614_729_600_000));
        assert_eq!(
            url,
            "http://prod.kaisens.fr:811/api/sleep/?deviceid=93debd97-6564-454b-be33-35bd377a2563&enddate=1614729600000&startdate=1612310400000&format=json"
        );
    }

    #[test]
    fn url_for_strips_trailing_slash() {
        let api = KaisensSleepApi::new(&settings_for("http://localhost:9000/".into())).unwrap();
        let url = api.url_for(QueryWindow::new(1, 2));
        assert!(url.starts_with("http://localhost:9000/api/sleep/?"));
    }

    #[tokio::test]
    async fn fetch_records_parses_array() {
        let (base, request_line) = serve_once(
            "200 OK",
            r#"[{"_id":1,"data":"{'sleep_duration': 6}","device_id":"d","timestamp":1612137600000},
                {"_id":2,"data":"{'sleep_duration': 8}","device_id":"d","timestamp":1612224000000}]"#,
        )
        .await;
        let api = KaisensSleepApi::new(&settings_for(base)).unwrap();

        let records = api.fetch_records(QueryWindow::new(10, 20)).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, 2);

        let line = request_line.await.unwrap();
        assert!(line.starts_with("GET /api/sleep/?deviceid="));
        assert!(line.contains("enddate=20&startdate=10&format=json"));
    }

    #[tokio::test]
    async fn fetch_records_empty_array() {
        let (base, _rx) = serve_once("200 OK", "[]").await;
        let api = KaisensSleepApi::new(&settings_for(base)).unwrap();
        let records = api.fetch_records(QueryWindow::new(0, 1)).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let (base, _rx) = serve_once("500 Internal Server Error", "oops").await;
        let api = KaisensSleepApi::new(&settings_for(base)).unwrap();
        match api.fetch_records(QueryWindow::new(0, 1)).await {
            Err(CoreError::Api { provider, message }) => {
                assert_eq!(provider, "Kaisens");
                assert!(message.contains("500"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_array_body_is_deserialization_error() {
        let (base, _rx) = serve_once("200 OK", r#"{"detail":"not found"}"#).await;
        let api = KaisensSleepApi::new(&settings_for(base)).unwrap();
        assert!(matches!(
            api.fetch_records(QueryWindow::new(0, 1)).await,
            Err(CoreError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn connection_refused_is_network_error_without_query() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = KaisensSleepApi::new(&settings_for(format!("http://{addr}"))).unwrap();
        match api.fetch_records(QueryWindow::new(0, 1)).await {
            Err(CoreError::Network(msg)) => {
                assert!(!msg.contains("deviceid="), "query leaked: {msg}");
            }
            other => panic!("expected Network error, got {other:?}"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// FetchService — retries
// ═══════════════════════════════════════════════════════════════════

mod fetch_service {
    use super::*;

    fn flaky(failures: u32, error: fn() -> CoreError) -> (Box<FlakySource>, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let source = Box::new(FlakySource {
            failures,
            calls: Arc::clone(&calls),
            error,
        });
        (source, calls)
    }

    #[tokio::test]
    async fn no_retries_by_default() {
        let (source, calls) = flaky(1, network_error);
        let svc = FetchService::new(source, 0);
        assert!(svc.fetch(QueryWindow::new(0, 1)).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_network_failures_until_success() {
        let (source, calls) = flaky(2, network_error);
        let svc = FetchService::new(source, 2);
        let records = svc.fetch(QueryWindow::new(0, 1)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_retry_budget() {
        let (source, calls) = flaky(5, network_error);
        let svc = FetchService::new(source, 2);
        assert!(matches!(
            svc.fetch(QueryWindow::new(0, 1)).await,
            Err(CoreError::Network(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_malformed_body() {
        let (source, calls) = flaky(1, body_error);
        let svc = FetchService::new(source, 3);
        assert!(matches!(
            svc.fetch(QueryWindow::new(0, 1)).await,
            Err(CoreError::Deserialization(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn source_name_is_forwarded() {
        let (source, _) = flaky(0, network_error);
        assert_eq!(FetchService::new(source, 0).source_name(), "Flaky");
    }
}

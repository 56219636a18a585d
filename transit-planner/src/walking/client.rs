//! Distance Matrix HTTP client.
//!
//! Measures walking time between two points with the Google Distance
//! Matrix API. Handles authentication, request concurrency limits, and
//! mapping of API status codes to errors.

use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Semaphore;

use crate::domain::Coordinate;

use super::WalkTimeProvider;
use super::error::WalkingError;
use super::types::DistanceMatrixResponse;

/// Default endpoint for the Distance Matrix API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Stays well under the service's per-second quota.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the Distance Matrix client.
#[derive(Debug, Clone)]
pub struct DistanceMatrixConfig {
    /// API key; without one every request fails with `MissingCredentials`
    pub api_key: Option<String>,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Requests allowed in flight at once
    pub max_concurrent: usize,
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,
}

impl DistanceMatrixConfig {
    /// Create a new config. An empty key counts as no key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 10,
        }
    }

    /// Point the client at another endpoint, e.g. a local test server.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Cap in-flight requests. At least one is always allowed.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n.max(1);
        self
    }

    /// Per-request timeout in seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Distance Matrix API client.
///
/// Uses a semaphore to limit concurrent requests and stay under the
/// service's rate limit.
#[derive(Debug, Clone)]
pub struct DistanceMatrixClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    semaphore: Arc<Semaphore>,
}

impl DistanceMatrixClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DistanceMatrixConfig) -> Result<Self, WalkingError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// True if an API key is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    /// Measure walking time from `from` to `to`.
    pub async fn walking_time(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<Duration, WalkingError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(WalkingError::MissingCredentials)?;

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| WalkingError::Api {
                status: 0,
                message: "request limiter closed".to_string(),
            })?;

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("origins", from.to_string()),
                ("destinations", to.to_string()),
                ("mode", "walking".to_string()),
                ("key", api_key.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(WalkingError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WalkingError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WalkingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let matrix: DistanceMatrixResponse =
            serde_json::from_str(&body).map_err(|e| WalkingError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        interpret(&matrix)
    }
}

/// Turn a parsed response into a walking duration.
///
/// The API reports most failures with HTTP 200 and a status string.
fn interpret(matrix: &DistanceMatrixResponse) -> Result<Duration, WalkingError> {
    match matrix.status.as_str() {
        "OK" => {}
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => return Err(WalkingError::RateLimited),
        "REQUEST_DENIED" => return Err(WalkingError::Unauthorized),
        other => {
            return Err(WalkingError::Api {
                status: 200,
                message: matrix
                    .error_message
                    .clone()
                    .unwrap_or_else(|| other.to_string()),
            });
        }
    }

    let element = matrix.first_element().ok_or_else(|| WalkingError::NoRoute {
        status: "EMPTY".to_string(),
    })?;

    match (&element.duration, element.status.as_str()) {
        (Some(duration), "OK") if duration.value >= 0 => Ok(Duration::seconds(duration.value)),
        _ => Err(WalkingError::NoRoute {
            status: element.status.clone(),
        }),
    }
}

impl WalkTimeProvider for DistanceMatrixClient {
    async fn walk_time(&self, from: Coordinate, to: Coordinate) -> Result<Duration, WalkingError> {
        self.walking_time(from, to).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn parse(json: &str) -> DistanceMatrixResponse {
        serde_json::from_str(json).unwrap()
    }

    /// Serve one canned HTTP response on a local port, returning its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/json")
    }

    fn points() -> (Coordinate, Coordinate) {
        (
            Coordinate::new(49.2606, -123.2460),
            Coordinate::new(49.2650, -123.2500),
        )
    }

    #[test]
    fn config_builder() {
        let config = DistanceMatrixConfig::new(Some("test-key".into()))
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(10)
            .with_timeout(60);

        assert_eq!(config.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = DistanceMatrixConfig::new(None);

        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn blank_key_is_no_key() {
        let config = DistanceMatrixConfig::new(Some("   ".into()));
        assert!(config.api_key.is_none());
        assert_eq!(DistanceMatrixConfig::new(None).with_max_concurrent(0).max_concurrent, 1);
    }

    #[test]
    fn interpret_ok() {
        let matrix = parse(
            r#"{"status":"OK","rows":[{"elements":[{"status":"OK","duration":{"value":298}}]}]}"#,
        );
        assert_eq!(interpret(&matrix).unwrap(), Duration::seconds(298));
    }

    #[test]
    fn interpret_failures() {
        let denied = parse(r#"{"status":"REQUEST_DENIED","rows":[]}"#);
        assert!(matches!(interpret(&denied), Err(WalkingError::Unauthorized)));

        let limited = parse(r#"{"status":"OVER_QUERY_LIMIT","rows":[]}"#);
        assert!(matches!(interpret(&limited), Err(WalkingError::RateLimited)));

        let invalid = parse(r#"{"status":"INVALID_REQUEST","error_message":"bad origins"}"#);
        match interpret(&invalid) {
            Err(WalkingError::Api { message, .. }) => assert_eq!(message, "bad origins"),
            other => panic!("unexpected {other:?}"),
        }

        let no_route =
            parse(r#"{"status":"OK","rows":[{"elements":[{"status":"ZERO_RESULTS"}]}]}"#);
        assert!(matches!(
            interpret(&no_route),
            Err(WalkingError::NoRoute { status }) if status == "ZERO_RESULTS"
        ));

        let empty = parse(r#"{"status":"OK","rows":[]}"#);
        assert!(matches!(interpret(&empty), Err(WalkingError::NoRoute { .. })));
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let client = DistanceMatrixClient::new(DistanceMatrixConfig::new(None)).unwrap();
        assert!(!client.has_credentials());
        let (a, b) = points();
        assert!(matches!(
            client.walking_time(a, b).await,
            Err(WalkingError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn measures_from_server() {
        let url = serve_once(
            "200 OK",
            r#"{"status":"OK","rows":[{"elements":[{"status":"OK","duration":{"value":420,"text":"7 mins"}}]}]}"#,
        )
        .await;
        let config = DistanceMatrixConfig::new(Some("k".into())).with_base_url(url);
        let client = DistanceMatrixClient::new(config).unwrap();
        let (a, b) = points();
        assert_eq!(client.walking_time(a, b).await.unwrap(), Duration::seconds(420));
    }

    #[tokio::test]
    async fn http_error_status() {
        let url = serve_once("500 Internal Server Error", "boom").await;
        let config = DistanceMatrixConfig::new(Some("k".into())).with_base_url(url);
        let client = DistanceMatrixClient::new(config).unwrap();
        let (a, b) = points();
        assert!(matches!(
            client.walking_time(a, b).await,
            Err(WalkingError::Api { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn malformed_body() {
        let url = serve_once("200 OK", "<html>nope</html>").await;
        let config = DistanceMatrixConfig::new(Some("k".into())).with_base_url(url);
        let client = DistanceMatrixClient::new(config).unwrap();
        let (a, b) = points();
        assert!(matches!(
            client.walking_time(a, b).await,
            Err(WalkingError::Json { .. })
        ));
    }
}

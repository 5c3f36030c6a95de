//! HTTP client for the backend integration API.
//!
//! Connecting is a `POST /api/integration/connect` whose parameters travel
//! in headers: the user's API key, the integration name, the service label
//! and the configuration as a JSON object. Failures come back as a non-2xx
//! status with an `{"error": "..."}` body.

use crate::connector::{ConnectRequest, IntegrationConnector};
use crate::error::ConnectorError;
use crate::record::{Integration, UserProfile};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

pub const API_KEY_HEADER: &str = "api-key";
pub const INTEGRATION_NAME_HEADER: &str = "integration-name";
pub const INTEGRATION_SERVICE_HEADER: &str = "integration-service";
pub const INTEGRATION_CONFIG_HEADER: &str = "integration-config";

/// Connection settings for the backend API.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpClientConfig {
    /// Base address of the backend, e.g. `http://localhost:8080`.
    pub api_address: String,

    /// Per-request timeout. Unset means no timeout.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Backend connector speaking the dashboard's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpIntegrationClient {
    http: reqwest::Client,
    api_address: String,
}

impl HttpIntegrationClient {
    /// Creates a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &HttpClientConfig) -> sluice_core::Result<Self, ConnectorError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| ConnectorError::Transport {
            reason: e.to_string(),
        })?;

        Ok(Self {
            http,
            api_address: config.api_address.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_address)
    }

    fn connect_headers(request: &ConnectRequest) -> Result<HeaderMap, ConnectorError> {
        let config = serde_json::to_string(&request.config).map_err(|e| {
            ConnectorError::InvalidRequest {
                reason: e.to_string(),
            }
        })?;

        let mut headers = HeaderMap::new();
        for (name, value) in [
            (API_KEY_HEADER, request.user.api_key.as_str()),
            (INTEGRATION_NAME_HEADER, request.name.as_str()),
            (INTEGRATION_SERVICE_HEADER, request.service.label()),
            (INTEGRATION_CONFIG_HEADER, config.as_str()),
        ] {
            let value =
                HeaderValue::from_str(value).map_err(|_| ConnectorError::InvalidRequest {
                    reason: format!("{name} contains characters that cannot be sent"),
                })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

fn transport_error(error: &reqwest::Error) -> ConnectorError {
    let reason = if error.is_timeout() {
        "request timed out".to_string()
    } else {
        error.to_string()
    };
    ConnectorError::Transport { reason }
}

/// Turns a non-2xx response into the backend's own error message.
async fn rejection(response: reqwest::Response) -> ConnectorError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let reason = match serde_json::from_str::<ErrorBody>(&body) {
        Ok(parsed) => parsed.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    debug!(%status, %reason, "backend rejected request");
    ConnectorError::Rejected { reason }
}

#[async_trait]
impl IntegrationConnector for HttpIntegrationClient {
    #[instrument(skip(self, request), fields(service = %request.service, name = %request.name))]
    async fn connect(&self, request: &ConnectRequest) -> Result<(), ConnectorError> {
        let headers = Self::connect_headers(request)?;

        let response = self
            .http
            .post(self.url("/api/integration/connect"))
            .headers(headers)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        Ok(())
    }

    #[instrument(skip(self, user), fields(user = %user.name))]
    async fn list_integrations(
        &self,
        user: &UserProfile,
    ) -> Result<Vec<Integration>, ConnectorError> {
        let response = self
            .http
            .get(self.url("/api/integrations"))
            .header(API_KEY_HEADER, user.api_key.as_str())
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let integrations: Vec<Integration> =
            response
                .json()
                .await
                .map_err(|e| ConnectorError::InvalidResponse {
                    reason: e.to_string(),
                })?;
        debug!(count = integrations.len(), "listed integrations");
        Ok(integrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::ConfigCollector;
    use crate::service::Service;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answers a single request with a canned response and returns the raw
    /// request head it received.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received: Vec<u8> = Vec::new();
            let mut chunk = [0u8; 1024];
            while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
            }

            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&received).into_owned()
        });

        (address, handle)
    }

    fn client(api_address: String) -> HttpIntegrationClient {
        HttpIntegrationClient::new(&HttpClientConfig {
            api_address,
            timeout_seconds: Some(5),
        })
        .expect("client builds")
    }

    fn postgres_request() -> ConnectRequest {
        let mut collector = ConfigCollector::new(Service::Postgres);
        collector.set_field("host", "db.internal").unwrap();
        collector.set_name("prod");
        ConnectRequest::from_collector(UserProfile::new("key-123", "ana"), &collector)
    }

    #[tokio::test]
    async fn connect_sends_parameters_as_headers() {
        let (address, server) = serve_once("HTTP/1.1 200 OK", "{}").await;

        client(address)
            .connect(&postgres_request())
            .await
            .expect("connect succeeds");

        let head = server.await.unwrap().to_lowercase();
        assert!(head.starts_with("post /api/integration/connect "));
        assert!(head.contains("api-key: key-123"));
        assert!(head.contains("integration-name: postgres/prod"));
        assert!(head.contains("integration-service: postgres"));
        assert!(head.contains(r#"integration-config: {"host":"db.internal"}"#));
    }

    #[tokio::test]
    async fn connect_surfaces_backend_error_message() {
        let (address, _server) =
            serve_once("HTTP/1.1 400 Bad Request", r#"{"error":"timeout"}"#).await;

        let err = client(address)
            .connect(&postgres_request())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ConnectorError::Rejected {
                reason: "timeout".to_string()
            }
        );
    }

    #[tokio::test]
    async fn connect_falls_back_to_status_reason() {
        let (address, _server) = serve_once("HTTP/1.1 503 Service Unavailable", "").await;

        let err = client(address)
            .connect(&postgres_request())
            .await
            .unwrap_err();

        assert_eq!(err.cause(), "Service Unavailable");
    }

    #[tokio::test]
    async fn list_decodes_integrations() {
        let (address, server) = serve_once(
            "HTTP/1.1 200 OK",
            r#"[{"id":"3fa85f64-5717-4562-b3fc-2c963f66afa6","service":"S3","name":"S3/events","createdAt":1650000000}]"#,
        )
        .await;

        let integrations = client(address)
            .list_integrations(&UserProfile::new("key-123", "ana"))
            .await
            .expect("list succeeds");

        assert_eq!(integrations.len(), 1);
        assert_eq!(integrations[0].service, Service::S3);
        assert_eq!(integrations[0].name, "S3/events");

        let head = server.await.unwrap().to_lowercase();
        assert!(head.starts_with("get /api/integrations "));
        assert!(head.contains("api-key: key-123"));
    }

    #[tokio::test]
    async fn trailing_slash_is_trimmed() {
        let client = client("http://localhost:8080/".to_string());
        assert_eq!(
            client.url("/api/integrations"),
            "http://localhost:8080/api/integrations"
        );
    }

    #[test]
    fn control_characters_in_headers_are_rejected() {
        let mut request = postgres_request();
        request.name = "Postgres/prod\n".to_string();

        let err = HttpIntegrationClient::connect_headers(&request).unwrap_err();
        assert!(matches!(err, ConnectorError::InvalidRequest { .. }));
    }
}

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/screener/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! HTTP client for the stock screener API.
//!
//! This crate implements the [`ScreenerApi`] trait from `screener-core` on top
//! of `reqwest`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use screener_http::{ClientConfig, HttpScreenerClient};
//! use screener_core::{Filter, Operator, ScreenRequest, ScreenerApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HttpScreenerClient::new(ClientConfig::from_env()?)?;
//!
//!     let fields = client.fields().await?;
//!     let request = ScreenRequest::new(vec![Filter::new("sector", Operator::Eq, "Technology")]);
//!     let rows = client.screen(&request).await?;
//!
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use screener_core::{
    CompanyDetail, FieldsResponse, Result, Row, ScreenRequest, ScreenResponse, ScreenerApi,
    ScreenerError,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

mod config;
pub use config::{API_BASE_ENV, ClientConfig, DEFAULT_API_BASE, TIMEOUT_ENV};

/// Screener API client speaking JSON over HTTP.
#[derive(Clone, Debug)]
pub struct HttpScreenerClient {
    client: Client,
    config: ClientConfig,
}

impl HttpScreenerClient {
    /// Create a new client from a configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ScreenerError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Create a new client with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScreenerError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// Make a POST request with a JSON body and parse the JSON response.
    async fn post<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T> {
        debug!(%url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ScreenerError::Network(e.to_string()))?;
        Self::decode(response).await
    }

    /// Turn a response into either a parsed body or a [`ScreenerError::Server`].
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ScreenerError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ScreenerError::Server {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        serde_json::from_str(&text).map_err(|e| ScreenerError::Parse(format!("{e}: {text}")))
    }
}

#[async_trait]
impl ScreenerApi for HttpScreenerClient {
    fn name(&self) -> &str {
        "HTTP"
    }

    #[instrument(skip(self))]
    async fn fields(&self) -> Result<Vec<String>> {
        let url = self.config.endpoint(&["fields"])?;
        let body: FieldsResponse = self.get(url).await?;
        debug!(count = body.fields.len(), "Loaded fields");
        Ok(body.fields)
    }

    #[instrument(skip(self, request), fields(filters = request.filters.len(), limit = request.limit, offset = request.offset))]
    async fn screen(&self, request: &ScreenRequest) -> Result<Vec<Row>> {
        let url = self.config.endpoint(&["screener"])?;
        let body: ScreenResponse = self.post(url, request).await?;
        debug!(rows = body.results.len(), "Screen finished");
        Ok(body.results)
    }

    #[instrument(skip(self))]
    async fn company(&self, symbol: &str) -> Result<CompanyDetail> {
        let url = self.config.endpoint(&["company", symbol])?;
        match self.get(url).await {
            Err(ScreenerError::Server { status: 404, .. }) => {
                warn!(symbol, "Company not found");
                Err(ScreenerError::NotFound(symbol.to_string()))
            }
            other => other,
        }
    }
}

/// FastAPI-style error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Extract the server's explanation from an error body.
///
/// Uses the `detail` field when the body carries one, the raw body when it is
/// short plain text, and the status line otherwise.
fn error_message(status: StatusCode, text: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(text) {
        return match body.detail {
            serde_json::Value::String(detail) => detail,
            other => other.to_string(),
        };
    }

    let trimmed = text.trim();
    if !trimmed.is_empty() && trimmed.len() <= 200 && !trimmed.starts_with('<') {
        return format!("HTTP {status}: {trimmed}");
    }
    format!("HTTP {status}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_uses_detail() {
        let msg = error_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail":"Database error: timeout"}"#,
        );
        assert_eq!(msg, "Database error: timeout");
    }

    #[test]
    fn test_error_message_structured_detail() {
        let msg = error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","filters"],"msg":"field required"}]}"#,
        );
        assert!(msg.contains("field required"));
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, ""),
            "HTTP 502 Bad Gateway"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, "<html>proxy</html>"),
            "HTTP 502 Bad Gateway"
        );
        assert_eq!(
            error_message(StatusCode::SERVICE_UNAVAILABLE, "maintenance"),
            "HTTP 503 Service Unavailable: maintenance"
        );
    }

    #[test]
    fn test_client_metadata() {
        let client = HttpScreenerClient::new(ClientConfig::default()).unwrap();
        assert_eq!(client.name(), "HTTP");
        assert_eq!(
            client.config().base_url().as_str(),
            "http://localhost:8000/"
        );
    }
}

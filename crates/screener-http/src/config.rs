//! Client configuration.

use reqwest::Url;
use screener_core::{Result, ScreenerError};
use std::time::Duration;

/// Environment variable holding the API base URL.
pub const API_BASE_ENV: &str = "SCREENER_API_BASE";

/// Environment variable holding an optional request timeout in seconds.
pub const TIMEOUT_ENV: &str = "SCREENER_TIMEOUT_SECS";

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Where and how the client reaches the screener API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: Url,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Creates a configuration for the given base URL, without a timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .map_err(|e| ScreenerError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ScreenerError::Config(format!(
                "base URL cannot carry paths: {base_url}"
            )));
        }
        Ok(Self {
            base_url,
            timeout: None,
        })
    }

    /// Reads the configuration from `SCREENER_API_BASE` and `SCREENER_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        let base = std::env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let config = Self::new(&base)?;

        match std::env::var(TIMEOUT_ENV) {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ScreenerError::Config(format!("{TIMEOUT_ENV} must be whole seconds, got {raw:?}"))
                })?;
                Ok(config.with_timeout(Duration::from_secs(secs)))
            }
            Err(_) => Ok(config),
        }
    }

    /// Sets a per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the per-request timeout, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Builds the URL of an endpoint below the base URL.
    ///
    /// Each segment is percent-encoded on its own, so a symbol such as
    /// `BRK/B` stays a single path segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ScreenerError::Config(format!("base URL cannot carry paths: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE).expect("default base URL is valid"),
            timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_building() {
        let config = ClientConfig::new("http://localhost:8000/").unwrap();
        assert_eq!(
            config.endpoint(&["fields"]).unwrap().as_str(),
            "http://localhost:8000/fields"
        );
        assert_eq!(
            config.endpoint(&["company", "AAPL"]).unwrap().as_str(),
            "http://localhost:8000/company/AAPL"
        );
    }

    #[test]
    fn test_endpoint_below_prefix() {
        let config = ClientConfig::new("https://example.com/api/v1").unwrap();
        assert_eq!(
            config.endpoint(&["screener"]).unwrap().as_str(),
            "https://example.com/api/v1/screener"
        );
    }

    #[test]
    fn test_symbol_is_one_segment() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoint(&["company", "BRK/B"]).unwrap().as_str(),
            "http://localhost:8000/company/BRK%2FB"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ClientConfig::new("not a url"),
            Err(ScreenerError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::new("mailto:ops@example.com"),
            Err(ScreenerError::Config(_))
        ));
    }

    #[test]
    fn test_timeout_builder() {
        let config = ClientConfig::default().with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(ClientConfig::default().timeout(), None);
    }
}

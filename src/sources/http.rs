//! HTTP transport for size lookups.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Failure of a single JSON request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport error or non-success HTTP status
    #[error("{0}")]
    Network(String),

    /// The body was not JSON
    #[error("{0}")]
    Malformed(String),
}

/// A JSON `GET` request function.
///
/// Implementations must be shareable across threads: one window's requests
/// all go through the same fetcher at once.
pub trait SizeFetcher: Sync {
    /// `GET endpoint?k1=v1&k2=v2…` and parse the body as JSON.
    fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, FetchError>;
}

/// [`SizeFetcher`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpSizeFetcher {
    client: reqwest::blocking::Client,
}

impl HttpSizeFetcher {
    /// Create a fetcher whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("shimgen/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpSizeFetcher { client })
    }
}

impl SizeFetcher for HttpSizeFetcher {
    fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = url::Url::parse_with_params(endpoint, params)
            .map_err(|e| FetchError::Network(format!("invalid endpoint '{}': {}", endpoint, e)))?;

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| FetchError::Network(format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "request to {} failed: HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Network(format!("failed to read response body: {}", e)))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Malformed(format!("invalid JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_endpoint_is_network_failure() {
        let fetcher = HttpSizeFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.get_json("not a url", &[("p", "has")]).unwrap_err();
        assert!(matches!(err, FetchError::Network(ref m) if m.contains("invalid endpoint")));
    }

    #[test]
    fn test_query_encoding() {
        let url = url::Url::parse_with_params(
            "https://packagephobia.com/api.json",
            &[("p", "array.prototype.flat")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://packagephobia.com/api.json?p=array.prototype.flat"
        );
    }
}

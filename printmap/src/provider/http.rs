//! HTTP client abstraction for testability

use std::time::Duration;

use super::types::ProviderError;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 8;

/// Default TCP connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a new ReqwestClient with the default timeouts (8 s request, 5 s connect).
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeouts(DEFAULT_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS)
    }

    /// Creates a new ReqwestClient with custom timeouts.
    pub fn with_timeouts(timeout_secs: u64, connect_timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(format!("printmap/{}", crate::VERSION))
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

fn classify(e: reqwest::Error) -> ProviderError {
    classify_send_failure(e.is_connect(), e.is_timeout(), e.to_string())
}

/// Maps a failed send to an error kind. Connect timeouts count as connection
/// failures; only a timeout after the connection was made is a `Timeout`.
fn classify_send_failure(connect: bool, timeout: bool, message: String) -> ProviderError {
    if timeout && !connect {
        ProviderError::Timeout(message)
    } else {
        ProviderError::Connection(message)
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self.client.get(url).send().map_err(classify)?;

        // Check HTTP status
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Read response body
        response.bytes().map(|b| b.to_vec()).map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(e.to_string())
            } else {
                ProviderError::InvalidResponse(format!("Failed to read response: {}", e))
            }
        })
    }
}

//! Provider types and traits

use std::fmt;

use crate::coord::TileIndex;

/// Errors that can occur while fetching a tile.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Endpoint could not be reached (DNS, refused, reset, connect timeout)
    Connection(String),
    /// Connected, but the response exceeded the configured timeout
    Timeout(String),
    /// Server answered with a non-success status
    HttpStatus { status: u16, url: String },
    /// Invalid response data from the endpoint
    InvalidResponse(String),
    /// Zoom level not served by this source
    UnsupportedZoom(u8),
    /// Client or endpoint configuration is unusable
    Configuration(String),
}

impl ProviderError {
    /// True when the failure happened before any HTTP response arrived.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, ProviderError::Connection(_))
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Connection(msg) => write!(f, "Connection failed: {}", msg),
            ProviderError::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            ProviderError::HttpStatus { status, url } => {
                write!(f, "HTTP {} from {}", status, url)
            }
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            ProviderError::UnsupportedZoom(zoom) => {
                write!(f, "Zoom level {} not supported by tile source", zoom)
            }
            ProviderError::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Trait for base-map tile sources.
///
/// Implementors return the encoded image bytes (PNG or JPEG) of one
/// 256×256 tile of the "PM" tile matrix set.
pub trait TileSource: Send + Sync {
    /// Downloads a single tile.
    ///
    /// # Arguments
    ///
    /// * `tile` - Tile address (zoom, column, row)
    ///
    /// # Returns
    ///
    /// Raw encoded image data or an error.
    fn fetch_tile(&self, tile: &TileIndex) -> Result<Vec<u8>, ProviderError>;

    /// Returns the source's name for logging and identification.
    fn name(&self) -> &str;

    /// Returns the minimum supported zoom level.
    fn min_zoom(&self) -> u8 {
        crate::coord::MIN_ZOOM
    }

    /// Returns the maximum supported zoom level.
    fn max_zoom(&self) -> u8 {
        crate::coord::MAX_ZOOM
    }

    /// Checks if this source supports the given zoom level.
    fn supports_zoom(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom() && zoom <= self.max_zoom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_classification() {
        assert!(ProviderError::Connection("refused".to_string()).is_connection_error());
        assert!(!ProviderError::Timeout("8s".to_string()).is_connection_error());
        assert!(!ProviderError::HttpStatus {
            status: 500,
            url: "http://example.com".to_string()
        }
        .is_connection_error());
    }

    #[test]
    fn test_display_http_status() {
        let err = ProviderError::HttpStatus {
            status: 404,
            url: "http://example.com/wmts".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from http://example.com/wmts");
    }
}

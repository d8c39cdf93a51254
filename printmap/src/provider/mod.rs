//! Base-map tile source abstraction
//!
//! This module provides the [`TileSource`] trait, the [`HttpClient`]
//! abstraction used to reach remote endpoints, and the WMTS `GetTile`
//! implementation.
//!
//! ```ignore
//! use printmap::provider::{ReqwestClient, WmtsLayer, WmtsProvider};
//!
//! let http_client = ReqwestClient::with_timeouts(8, 5)?;
//! let source = WmtsProvider::new(http_client, WmtsLayer::default())?;
//! ```

mod http;
mod types;
mod wmts;

pub use http::{HttpClient, ReqwestClient, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
pub use types::{ProviderError, TileSource};
pub use wmts::{
    WmtsLayer, WmtsProvider, DEFAULT_BASE_URL, DEFAULT_FORMAT, DEFAULT_LAYER, DEFAULT_STYLE,
    DEFAULT_TILE_MATRIX_SET,
};

#[cfg(test)]
pub use http::tests::MockHttpClient;

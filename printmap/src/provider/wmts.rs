//! WMTS `GetTile` tile source.
//!
//! Requests tiles with the key-value-pair encoding of OGC WMTS 1.0.0:
//!
//! `{base}?SERVICE=WMTS&REQUEST=GetTile&VERSION=1.0.0&LAYER={layer}&STYLE={style}
//! &FORMAT={format}&TILEMATRIXSET={set}&TILEMATRIX={z}&TILEROW={row}&TILECOL={col}`
//!
//! Defaults target the IGN Géoplateforme plan layer in the "PM" (Web
//! Mercator) tile matrix set.

use reqwest::Url;

use crate::coord::TileIndex;
use crate::provider::{HttpClient, ProviderError, TileSource};

pub const DEFAULT_BASE_URL: &str = "https://data.geopf.fr/wmts";
pub const DEFAULT_LAYER: &str = "GEOGRAPHICALGRIDSYSTEMS.PLANIGNV2";
pub const DEFAULT_STYLE: &str = "normal";
pub const DEFAULT_FORMAT: &str = "image/png";
pub const DEFAULT_TILE_MATRIX_SET: &str = "PM";

/// Layer parameters of a WMTS endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WmtsLayer {
    pub base_url: String,
    pub layer: String,
    pub style: String,
    pub format: String,
    pub tile_matrix_set: String,
}

impl Default for WmtsLayer {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            layer: DEFAULT_LAYER.to_string(),
            style: DEFAULT_STYLE.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            tile_matrix_set: DEFAULT_TILE_MATRIX_SET.to_string(),
        }
    }
}

/// Tile source backed by a WMTS `GetTile` endpoint.
///
/// # Example
///
/// ```ignore
/// use printmap::provider::{ReqwestClient, WmtsLayer, WmtsProvider};
///
/// let client = ReqwestClient::new()?;
/// let source = WmtsProvider::new(client, WmtsLayer::default())?;
/// ```
pub struct WmtsProvider<C: HttpClient> {
    http_client: C,
    layer: WmtsLayer,
    base_url: Url,
}

impl<C: HttpClient> WmtsProvider<C> {
    /// Creates a new WMTS tile source.
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `layer` - Endpoint and layer parameters
    ///
    /// # Returns
    ///
    /// An error when the base URL is not an absolute http(s) URL.
    pub fn new(http_client: C, layer: WmtsLayer) -> Result<Self, ProviderError> {
        let base_url = Url::parse(&layer.base_url).map_err(|e| {
            ProviderError::Configuration(format!("Invalid WMTS base URL '{}': {}", layer.base_url, e))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ProviderError::Configuration(format!(
                "Unsupported WMTS URL scheme '{}'",
                base_url.scheme()
            )));
        }

        Ok(Self {
            http_client,
            layer,
            base_url,
        })
    }

    pub fn layer(&self) -> &WmtsLayer {
        &self.layer
    }

    /// Builds the `GetTile` URL for a tile. Parameters are percent-encoded.
    pub fn build_url(&self, tile: &TileIndex) -> String {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("SERVICE", "WMTS")
            .append_pair("REQUEST", "GetTile")
            .append_pair("VERSION", "1.0.0")
            .append_pair("LAYER", &self.layer.layer)
            .append_pair("STYLE", &self.layer.style)
            .append_pair("FORMAT", &self.layer.format)
            .append_pair("TILEMATRIXSET", &self.layer.tile_matrix_set)
            .append_pair("TILEMATRIX", &tile.zoom.to_string())
            .append_pair("TILEROW", &tile.row.to_string())
            .append_pair("TILECOL", &tile.col.to_string());
        url.into()
    }
}

impl<C: HttpClient> TileSource for WmtsProvider<C> {
    fn fetch_tile(&self, tile: &TileIndex) -> Result<Vec<u8>, ProviderError> {
        if !self.supports_zoom(tile.zoom) {
            return Err(ProviderError::UnsupportedZoom(tile.zoom));
        }

        let url = self.build_url(tile);
        self.http_client.get(&url)
    }

    fn name(&self) -> &str {
        "WMTS"
    }
}

//! Export errors.

use thiserror::Error;

use crate::geometry::GeometryError;
use crate::mosaic::MosaicError;
use crate::render::RenderError;
use crate::territory::DataSourceError;

/// Errors that abort an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A territory geometry could not be decoded.
    #[error("Territory '{name}' has invalid geometry: {source}")]
    Geometry {
        name: String,
        #[source]
        source: GeometryError,
    },

    /// Territory lookup failed.
    #[error("Territory data unavailable: {0}")]
    DataSource(#[from] DataSourceError),

    /// Base map could not be assembled.
    #[error("Base map failed: {0}")]
    Mosaic(#[from] MosaicError),

    /// Canvas creation, font loading or PNG encoding failed.
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    /// The caller cancelled the export.
    #[error("Export cancelled")]
    Cancelled,
}

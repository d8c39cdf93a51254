//! Rendering errors.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// Canvas dimensions are zero or too large to allocate.
    #[error("Invalid canvas size {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },

    /// Font file could not be read.
    #[error("Failed to read font {path}: {source}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Font data is not a usable TrueType/OpenType font.
    #[error("Invalid font data: {0}")]
    InvalidFont(String),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

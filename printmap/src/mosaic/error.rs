//! Mosaic assembly errors.

use thiserror::Error;

/// Errors that abort a mosaic fetch.
///
/// Individual tile failures are not errors: they are replaced by a
/// placeholder tile.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// Every tile failed before any HTTP response arrived.
    #[error("Tile endpoint unreachable: all {attempted} requests failed ({last_error})")]
    EndpointUnreachable { attempted: usize, last_error: String },

    /// The caller cancelled the fetch.
    #[error("Mosaic fetch cancelled")]
    Cancelled,

    /// Requested extent needs more tiles than a single mosaic may hold.
    #[error("Mosaic too large: {cols}x{rows} tiles (max {max} tiles)")]
    TooLarge { cols: u32, rows: u32, max: usize },

    /// Worker pool could not be created.
    #[error("Failed to build download pool: {0}")]
    ThreadPool(String),
}

//! Geometry decoding errors.

use thiserror::Error;

/// Errors raised while decoding WKB geometry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// Input ended before the geometry was complete.
    #[error("Truncated WKB: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    /// Byte-order marker other than 0 (big endian) or 1 (little endian).
    #[error("Invalid WKB byte order marker: {0}")]
    InvalidByteOrder(u8),

    /// Geometry type is not the one the caller asked for.
    #[error("Unexpected geometry type {found} (expected {expected})")]
    UnexpectedType { expected: &'static str, found: u32 },

    /// Polygon without rings, multipolygon without members, or empty point.
    #[error("Empty geometry")]
    Empty,

    /// Bytes left over after a complete geometry.
    #[error("{0} trailing bytes after geometry")]
    TrailingBytes(usize),
}

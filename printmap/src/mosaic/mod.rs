//! Base-map mosaic assembly
//!
//! [`MosaicFetcher`] downloads every tile covering an envelope and stitches
//! them into a grid-aligned raster; [`crop`] cuts that raster down to the
//! exact requested extent.

mod crop;
mod error;
mod fetcher;
mod types;

pub use crop::{crop, CropRect};
pub use error::MosaicError;
pub use fetcher::{MosaicFetcher, DEFAULT_MAX_PARALLEL, MAX_MOSAIC_TILES};
pub use types::{CroppedMosaic, Mosaic, TileRaster, PLACEHOLDER_COLOR};

//! Mosaic value types

use image::{Rgba, RgbaImage};

use crate::coord::{GeoEnvelope, TileIndex, TileRange, TILE_SIZE};

/// Neutral grey used for tiles that could not be fetched.
pub const PLACEHOLDER_COLOR: Rgba<u8> = Rgba([235, 235, 235, 255]);

/// One decoded 256×256 tile.
#[derive(Debug, Clone)]
pub struct TileRaster {
    pub tile: TileIndex,
    pub image: RgbaImage,
    /// True when `image` is the grey fallback rather than fetched content.
    pub placeholder: bool,
}

impl TileRaster {
    /// Grey fallback for a failed tile.
    pub fn placeholder(tile: TileIndex) -> Self {
        Self {
            tile,
            image: RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, PLACEHOLDER_COLOR),
            placeholder: true,
        }
    }

    /// Decodes fetched tile bytes (PNG, JPEG, ...).
    ///
    /// # Returns
    ///
    /// A description of the problem when the data cannot be decoded or the
    /// image is not exactly 256×256.
    pub fn decode(tile: TileIndex, data: &[u8]) -> Result<Self, String> {
        let image = image::load_from_memory(data)
            .map_err(|e| format!("Undecodable tile image: {}", e))?
            .to_rgba8();

        if image.width() != TILE_SIZE || image.height() != TILE_SIZE {
            return Err(format!(
                "Unexpected tile size {}x{} (expected {}x{})",
                image.width(),
                image.height(),
                TILE_SIZE,
                TILE_SIZE
            ));
        }

        Ok(Self {
            tile,
            image,
            placeholder: false,
        })
    }
}

/// Tiles stitched into one raster, aligned to the tile grid.
#[derive(Debug, Clone)]
pub struct Mosaic {
    pub image: RgbaImage,
    /// Grid-aligned EPSG:3857 envelope, a superset of the requested one.
    pub envelope: GeoEnvelope,
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub range: TileRange,
    /// Number of grid cells filled with the placeholder.
    pub placeholder_tiles: usize,
}

/// Mosaic cut down to the requested extent.
#[derive(Debug, Clone)]
pub struct CroppedMosaic {
    pub image: RgbaImage,
    /// Exactly the requested envelope.
    pub envelope: GeoEnvelope,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

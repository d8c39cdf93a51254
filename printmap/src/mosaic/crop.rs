//! Cropping a grid-aligned mosaic to an exact extent.

use image::imageops;

use super::types::{CroppedMosaic, Mosaic};
use crate::coord::GeoEnvelope;

/// Pixel rectangle inside a mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Computes the pixel rectangle of `wanted` inside a raster of
    /// `pixel_width`×`pixel_height` covering `raster_envelope`.
    ///
    /// Offsets and extents are rounded to the nearest pixel. The origin is
    /// clamped into the raster, the extent is clamped to the raster edge,
    /// and the result is never smaller than 1×1.
    pub fn compute(
        raster_envelope: &GeoEnvelope,
        pixel_width: u32,
        pixel_height: u32,
        wanted: &GeoEnvelope,
    ) -> Self {
        let ppm_x = pixel_width as f64 / raster_envelope.width();
        let ppm_y = pixel_height as f64 / raster_envelope.height();

        let x = ((wanted.min_x - raster_envelope.min_x) * ppm_x).round() as i64;
        let y = ((raster_envelope.max_y - wanted.max_y) * ppm_y).round() as i64;
        let w = (wanted.width() * ppm_x).round() as i64;
        let h = (wanted.height() * ppm_y).round() as i64;

        let raster_w = pixel_width as i64;
        let raster_h = pixel_height as i64;

        let x = x.clamp(0, (raster_w - 1).max(0));
        let y = y.clamp(0, (raster_h - 1).max(0));
        let w = w.min(raster_w - x).max(1);
        let h = h.min(raster_h - y).max(1);

        Self {
            x: x as u32,
            y: y as u32,
            width: w as u32,
            height: h as u32,
        }
    }
}

/// Crops `mosaic` to `wanted`.
///
/// The returned envelope is `wanted` itself, not the envelope of the
/// rounded pixel rectangle; overlay projection relies on this.
pub fn crop(mosaic: &Mosaic, wanted: &GeoEnvelope) -> CroppedMosaic {
    let rect = CropRect::compute(
        &mosaic.envelope,
        mosaic.pixel_width,
        mosaic.pixel_height,
        wanted,
    );
    let image = imageops::crop_imm(&mosaic.image, rect.x, rect.y, rect.width, rect.height)
        .to_image();

    CroppedMosaic {
        pixel_width: image.width(),
        pixel_height: image.height(),
        image,
        envelope: *wanted,
    }
}

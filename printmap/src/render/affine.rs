//! World (EPSG:3857) to canvas pixel mapping.

use super::Placement;
use crate::coord::GeoEnvelope;

/// Uniform scale plus translation with a flipped Y axis.
///
/// `px = x * scale + offset_x`, `py = offset_y - y * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMapping {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl AffineMapping {
    /// Maps `envelope` onto the placed raster: its west edge lands on
    /// `pad_x` and its north edge on `pad_y`.
    pub fn from_placement(envelope: &GeoEnvelope, placement: &Placement) -> Self {
        let scale = if envelope.width() > 0.0 {
            placement.draw_width as f64 / envelope.width()
        } else if envelope.height() > 0.0 {
            placement.draw_height as f64 / envelope.height()
        } else {
            1.0
        };

        Self {
            scale,
            offset_x: placement.pad_x as f64 - envelope.min_x * scale,
            offset_y: placement.pad_y as f64 + envelope.max_y * scale,
        }
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale + self.offset_x, self.offset_y - y * self.scale)
    }
}

//! Aspect-preserving fit of a raster onto the page.

/// Where a raster lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub scale: f64,
    pub draw_width: u32,
    pub draw_height: u32,
    pub pad_x: i32,
    pub pad_y: i32,
}

impl Placement {
    /// Fits a `source_width`×`source_height` raster inside the canvas,
    /// centred, without distortion.
    ///
    /// `scale = min(W / w, H / h)`, draw sizes are rounded and padding uses
    /// integer halving, so the leftover pixel of an odd margin goes to the
    /// right/bottom.
    pub fn fit(source_width: u32, source_height: u32, canvas_width: u32, canvas_height: u32) -> Self {
        let sw = source_width.max(1) as f64;
        let sh = source_height.max(1) as f64;
        let scale = (canvas_width as f64 / sw).min(canvas_height as f64 / sh);

        let draw_width = (sw * scale).round() as u32;
        let draw_height = (sh * scale).round() as u32;

        Self {
            scale,
            draw_width,
            draw_height,
            pad_x: (canvas_width as i64 - draw_width as i64) as i32 / 2,
            pad_y: (canvas_height as i64 - draw_height as i64) as i32 / 2,
        }
    }
}

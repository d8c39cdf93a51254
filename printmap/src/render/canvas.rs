//! Fixed-size RGBA drawing surface.

use std::io::Cursor;

use image::{imageops, ImageFormat, RgbaImage};
use tiny_skia::{ColorU8, Pixmap, PixmapPaint, Transform};

use super::RenderError;

/// Transparent canvas of the output page size.
///
/// Pixels are stored premultiplied (tiny-skia); conversion to straight
/// alpha happens when exporting.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Creates a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidCanvasSize { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Scales `image` to `width`×`height` (bilinear) and composites it with
    /// its top-left corner at `(x, y)`. A zero target size draws nothing.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let scaled;
        let source = if image.dimensions() == (width, height) {
            image
        } else {
            scaled = imageops::resize(image, width, height, imageops::FilterType::Triangle);
            &scaled
        };

        if let Some(layer) = to_pixmap(source) {
            self.pixmap.draw_pixmap(
                x,
                y,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }

    /// Returns the canvas as a straight-alpha RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
        }
        out
    }

    /// Encodes the canvas as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut buffer = Cursor::new(Vec::new());
        self.to_rgba_image()
            .write_to(&mut buffer, ImageFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(buffer.into_inner())
    }
}

/// Converts a straight-alpha image into a premultiplied pixmap.
fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

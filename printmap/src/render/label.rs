//! Label font loading, measurement and text drawing.

use std::path::Path;

use rusttype::{point, Font, PositionedGlyph, Scale};
use tiny_skia::{ColorU8, Pixmap, PremultipliedColorU8};

use super::RenderError;

/// Embedded font data - DejaVu Sans
const FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Default label size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 18.0;

/// Sans-serif font at a fixed pixel size, used for territory names.
#[derive(Clone)]
pub struct LabelFont {
    font: Font<'static>,
    scale: Scale,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("size", &self.scale.y)
            .finish()
    }
}

impl LabelFont {
    /// Loads the embedded DejaVu Sans.
    pub fn embedded(size: f32) -> Result<Self, RenderError> {
        let font = Font::try_from_bytes(FONT_DATA)
            .ok_or_else(|| RenderError::InvalidFont("embedded font".to_string()))?;
        Ok(Self::with_font(font, size))
    }

    /// Loads a TrueType/OpenType font from disk.
    pub fn from_file(path: &Path, size: f32) -> Result<Self, RenderError> {
        let data = std::fs::read(path).map_err(|source| RenderError::FontRead {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::try_from_vec(data)
            .ok_or_else(|| RenderError::InvalidFont(path.display().to_string()))?;
        Ok(Self::with_font(font, size))
    }

    fn with_font(font: Font<'static>, size: f32) -> Self {
        let size = if size.is_finite() && size > 0.0 {
            size
        } else {
            DEFAULT_FONT_SIZE
        };
        Self {
            font,
            scale: Scale::uniform(size),
        }
    }

    pub fn size(&self) -> f32 {
        self.scale.y
    }

    /// Distance from the baseline to the top of the tallest glyphs.
    pub fn ascent(&self) -> f32 {
        self.font.v_metrics(self.scale).ascent
    }

    fn layout(&self, text: &str, x: f32, baseline: f32) -> Vec<PositionedGlyph<'static>> {
        self.font
            .layout(text, self.scale, point(x, baseline))
            .collect()
    }

    /// Advance width of `text` in pixels.
    pub fn measure(&self, text: &str) -> f32 {
        self.layout(text, 0.0, 0.0)
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }

    /// Draws `text` with its left edge at `x` and its baseline at `baseline`.
    ///
    /// Glyph coverage is blended source-over into the premultiplied pixmap;
    /// pixels outside the pixmap are clipped.
    pub fn draw(&self, pixmap: &mut Pixmap, text: &str, x: f32, baseline: f32, color: ColorU8) {
        let width = pixmap.width() as i32;
        let height = pixmap.height() as i32;
        let pixels = pixmap.pixels_mut();

        for glyph in self.layout(text, x, baseline) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };

            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px < 0 || py < 0 || px >= width || py >= height {
                    return;
                }

                let idx = (py * width + px) as usize;
                pixels[idx] = blend(pixels[idx], color, coverage);
            });
        }
    }
}

/// Source-over of `color` at `coverage` onto a premultiplied pixel.
fn blend(dst: PremultipliedColorU8, color: ColorU8, coverage: f32) -> PremultipliedColorU8 {
    let sa = (color.alpha() as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let inv = 1.0 - sa;

    let a = sa * 255.0 + dst.alpha() as f32 * inv;
    let mix = |src: u8, dst: u8| (src as f32 * sa + dst as f32 * inv).min(a);

    let a_out = a.round().min(255.0) as u8;
    let channel = |v: f32| (v.round() as u8).min(a_out);

    PremultipliedColorU8::from_rgba(
        channel(mix(color.red(), dst.red())),
        channel(mix(color.green(), dst.green())),
        channel(mix(color.blue(), dst.blue())),
        a_out,
    )
    .unwrap_or(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> LabelFont {
        LabelFont::embedded(DEFAULT_FONT_SIZE).unwrap()
    }

    #[test]
    fn test_embedded_font_metrics() {
        let font = font();
        assert_eq!(font.size(), 18.0);
        let ascent = font.ascent();
        assert!(ascent > 10.0 && ascent < 18.0, "ascent {}", ascent);
    }

    #[test]
    fn test_measure_grows_with_text() {
        let font = font();
        assert_eq!(font.measure(""), 0.0);

        let one = font.measure("L");
        let four = font.measure("Lyon");
        assert!(one > 0.0);
        assert!(four > one);
        assert!(four < 18.0 * 4.0);
    }

    #[test]
    fn test_invalid_size_uses_default() {
        let font = LabelFont::embedded(-3.0).unwrap();
        assert_eq!(font.size(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_from_file_missing() {
        let result = LabelFont::from_file(Path::new("/nonexistent/font.ttf"), 18.0);
        assert!(matches!(result, Err(RenderError::FontRead { .. })));
    }

    #[test]
    fn test_from_file_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"definitely not a font").unwrap();

        let result = LabelFont::from_file(&path, 18.0);
        assert!(matches!(result, Err(RenderError::InvalidFont(_))));
    }

    #[test]
    fn test_draw_marks_pixels_and_clips() {
        let font = font();
        let mut pixmap = Pixmap::new(80, 30).unwrap();

        // Partly off the right edge
        font.draw(&mut pixmap, "Lyon", 50.0, 20.0, ColorU8::from_rgba(0, 0, 0, 255));

        let inked = pixmap.pixels().iter().filter(|p| p.alpha() > 0).count();
        assert!(inked > 0);
        assert!(pixmap.pixels()[0].alpha() == 0);
    }

    #[test]
    fn test_blend_opaque_over_transparent() {
        let dst = PremultipliedColorU8::TRANSPARENT;
        let out = blend(dst, ColorU8::from_rgba(0, 0, 0, 255), 1.0);
        assert_eq!(out.alpha(), 255);
        assert_eq!(out.red(), 0);

        let half = blend(dst, ColorU8::from_rgba(255, 255, 255, 255), 0.5);
        assert_eq!(half.alpha(), 128);
        assert_eq!(half.red(), 128);
    }
}

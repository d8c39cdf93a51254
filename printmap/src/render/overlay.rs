//! Territory boundary and label overlay.

use geo_types::LineString;
use tiny_skia::{Color, ColorU8, FillRule, Paint, Path, PathBuilder, Stroke, Transform};

use super::{fill_color, AffineMapping, Canvas, LabelFont};
use crate::territory::BoundaryRecord;

/// Colours and widths of the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub stroke_color: ColorU8,
    pub stroke_width: f32,
    pub halo_color: ColorU8,
    pub text_color: ColorU8,
    /// Corner radius of the label halo.
    pub halo_radius: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            stroke_color: ColorU8::from_rgba(45, 45, 45, 200),
            stroke_width: 1.4,
            halo_color: ColorU8::from_rgba(255, 255, 255, 220),
            text_color: ColorU8::from_rgba(0, 0, 0, 255),
            halo_radius: 3.0,
        }
    }
}

/// Draws territory fills, outlines and name labels onto a canvas.
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    font: LabelFont,
    style: OverlayStyle,
}

impl OverlayRenderer {
    pub fn new(font: LabelFont) -> Self {
        Self {
            font,
            style: OverlayStyle::default(),
        }
    }

    pub fn with_style(font: LabelFont, style: OverlayStyle) -> Self {
        Self { font, style }
    }

    pub fn font(&self) -> &LabelFont {
        &self.font
    }

    /// Renders every boundary, then (optionally) every label on top.
    ///
    /// # Arguments
    ///
    /// * `canvas` - Target canvas, already holding the base map
    /// * `mapping` - World to pixel transform
    /// * `boundaries` - Decoded territories, drawn in order
    /// * `draw_labels` - Whether to draw names
    pub fn render(
        &self,
        canvas: &mut Canvas,
        mapping: &AffineMapping,
        boundaries: &[BoundaryRecord],
        draw_labels: bool,
    ) {
        for record in boundaries {
            self.draw_boundary(canvas, mapping, record);
        }

        if draw_labels {
            for record in boundaries {
                self.draw_label(canvas, mapping, record);
            }
        }
    }

    fn draw_boundary(&self, canvas: &mut Canvas, mapping: &AffineMapping, record: &BoundaryRecord) {
        let mut fill = PathBuilder::new();
        let mut outline = PathBuilder::new();

        for polygon in &record.boundary.0 {
            let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
            for ring in rings {
                let points = project_ring(ring, mapping);
                if points.len() >= 3 {
                    append_ring(&mut fill, &points);
                }
                if points.len() >= 2 {
                    append_ring(&mut outline, &points);
                }
            }
        }

        let pixmap = canvas.pixmap_mut();

        if let Some(path) = fill.finish() {
            let color = fill_color(record.owner_color.as_deref());
            pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::EvenOdd,
                Transform::identity(),
                None,
            );
        }

        if let Some(path) = outline.finish() {
            let stroke = Stroke {
                width: self.style.stroke_width,
                ..Stroke::default()
            };
            pixmap.stroke_path(
                &path,
                &paint(self.style.stroke_color),
                &stroke,
                Transform::identity(),
                None,
            );
        }
    }

    /// Draws the halo and name centred on the label point. Records with an
    /// empty name get no label.
    fn draw_label(&self, canvas: &mut Canvas, mapping: &AffineMapping, record: &BoundaryRecord) {
        if record.name.is_empty() {
            return;
        }

        let (px, py) = mapping.apply(record.label.x(), record.label.y());
        if !px.is_finite() || !py.is_finite() {
            return;
        }
        let x = px.round() as f32;
        let y = py.round() as f32;
        let w = self.font.measure(&record.name).round();
        let ascent = self.font.ascent().round();

        let left = x - (w / 2.0).trunc() - 4.0;
        let top = y - ascent;
        let halo_w = w + 8.0;
        let halo_h = ascent + 6.0;

        // Halo entirely off the page
        if left + halo_w < 0.0
            || top + halo_h < 0.0
            || left > canvas.width() as f32
            || top > canvas.height() as f32
        {
            return;
        }

        let halo = rounded_rect(left, top, halo_w, halo_h, self.style.halo_radius);

        let pixmap = canvas.pixmap_mut();
        if let Some(path) = halo {
            pixmap.fill_path(
                &path,
                &paint(self.style.halo_color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }

        self.font.draw(
            pixmap,
            &record.name,
            left + 4.0,
            y,
            self.style.text_color,
        );
    }
}

fn paint(color: ColorU8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(Color::from_rgba8(
        color.red(),
        color.green(),
        color.blue(),
        color.alpha(),
    ));
    paint.anti_alias = true;
    paint
}

/// Projects a ring to pixels, dropping the closing duplicate.
fn project_ring(ring: &LineString<f64>, mapping: &AffineMapping) -> Vec<(f32, f32)> {
    let mut coords = ring.0.as_slice();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords = &coords[..coords.len() - 1];
    }

    coords
        .iter()
        .map(|c| {
            let (x, y) = mapping.apply(c.x, c.y);
            (x as f32, y as f32)
        })
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect()
}

fn append_ring(pb: &mut PathBuilder, points: &[(f32, f32)]) {
    let Some(((x0, y0), rest)) = points.split_first() else {
        return;
    };
    pb.move_to(*x0, *y0);
    for (x, y) in rest {
        pb.line_to(*x, *y);
    }
    pb.close();
}

/// Rectangle with circular corners approximated by cubic Béziers.
fn rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<Path> {
    if w <= 0.0 || h <= 0.0 {
        return None;
    }
    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);
    // Control point distance for a quarter circle
    let k = r * 0.552_284_8;
    let (right, bottom) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

//! Paper size to canvas pixel conversion.

use std::fmt;

const MM_PER_INCH: f64 = 25.4;

/// Supported ISO paper formats.
///
/// Unknown codes fall back to [`PaperSize::A4`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperSize {
    A3,
    #[default]
    A4,
}

impl PaperSize {
    /// Parses a paper code, case-insensitively. Anything other than `A3` is A4.
    pub fn from_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("a3") {
            PaperSize::A3
        } else {
            PaperSize::A4
        }
    }

    /// Landscape dimensions `(long, short)` in millimetres.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        match self {
            PaperSize::A3 => (420.0, 297.0),
            PaperSize::A4 => (297.0, 210.0),
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperSize::A3 => write!(f, "A3"),
            PaperSize::A4 => write!(f, "A4"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Longer side vertical.
    Portrait,
    /// Longer side horizontal.
    #[default]
    Landscape,
}

impl Orientation {
    /// `portrait` (any case) is portrait; everything else is landscape.
    pub fn from_code(code: &str) -> Self {
        if code.trim().eq_ignore_ascii_case("portrait") {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
        }
    }
}

fn mm_to_px(mm: f64, dpi: u32) -> u32 {
    (mm / MM_PER_INCH * dpi as f64).round() as u32
}

/// Computes the canvas size in pixels for a paper format at a resolution.
///
/// # Returns
///
/// `(width, height)`. A `dpi` of zero yields `(0, 0)`, which the renderer
/// rejects as an invalid canvas.
pub fn paper_to_pixels(paper: PaperSize, orientation: Orientation, dpi: u32) -> (u32, u32) {
    let (long_mm, short_mm) = paper.dimensions_mm();
    let long = mm_to_px(long_mm, dpi);
    let short = mm_to_px(short_mm, dpi);

    match orientation {
        Orientation::Landscape => (long, short),
        Orientation::Portrait => (short, long),
    }
}

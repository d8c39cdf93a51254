//! Export request parameters.

use crate::page::{Orientation, PaperSize};

/// Default output resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Default base map zoom.
pub const DEFAULT_ZOOM: i32 = 14;

/// What to export and at which size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub dpi: u32,
    /// Only territories of this region, or all when `None`.
    pub region: Option<String>,
    /// Base map zoom, clamped to 0..=19 when fetching.
    pub zoom: i32,
    pub draw_labels: bool,
}

impl Default for ExportRequest {
    fn default() -> Self {
        Self {
            paper: PaperSize::default(),
            orientation: Orientation::default(),
            dpi: DEFAULT_DPI,
            region: None,
            zoom: DEFAULT_ZOOM,
            draw_labels: true,
        }
    }
}

impl ExportRequest {
    /// Builds a request from loosely typed parameters.
    ///
    /// Unknown paper and orientation codes fall back to A4 landscape, and
    /// a blank region means "all regions".
    pub fn from_params(
        paper: &str,
        orientation: &str,
        dpi: u32,
        region: Option<&str>,
        zoom: i32,
        draw_labels: bool,
    ) -> Self {
        Self {
            paper: PaperSize::from_code(paper),
            orientation: Orientation::from_code(orientation),
            dpi,
            region: region
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
            zoom,
            draw_labels,
        }
    }

    /// Output size in pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        crate::page::paper_to_pixels(self.paper, self.orientation, self.dpi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = ExportRequest::default();
        assert_eq!(request.paper, PaperSize::A4);
        assert_eq!(request.orientation, Orientation::Landscape);
        assert_eq!(request.dpi, 300);
        assert_eq!(request.region, None);
        assert_eq!(request.zoom, 14);
        assert!(request.draw_labels);
        assert_eq!(request.canvas_size(), (3508, 2480));
    }

    #[test]
    fn test_from_params_fallbacks() {
        let request = ExportRequest::from_params("letter", "sideways", 150, Some("  "), 12, false);
        assert_eq!(request.paper, PaperSize::A4);
        assert_eq!(request.orientation, Orientation::Landscape);
        assert_eq!(request.region, None);
        assert!(!request.draw_labels);
        assert_eq!(request.canvas_size(), (1754, 1240));
    }

    #[test]
    fn test_from_params_recognised() {
        let request = ExportRequest::from_params("a3", "PORTRAIT", 300, Some("lyon"), 15, true);
        assert_eq!(request.paper, PaperSize::A3);
        assert_eq!(request.orientation, Orientation::Portrait);
        assert_eq!(request.region.as_deref(), Some("lyon"));
        assert_eq!(request.canvas_size(), (3508, 4961));
    }
}

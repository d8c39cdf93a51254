//! Map export orchestration.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::error::ExportError;
use super::request::ExportRequest;
use crate::coord::{clamp_zoom, resolution, GeoEnvelope, TILE_SIZE};
use crate::mosaic::{self, MosaicError, MosaicFetcher};
use crate::render::{AffineMapping, Canvas, OverlayRenderer, Placement};
use crate::territory::{BoundaryRecord, TerritoryDataProvider};

/// Default margin around the territories, as a fraction of the bbox size.
pub const DEFAULT_MARGIN: f64 = 0.03;

/// Produces print-ready PNG maps of territories over a WMTS base map.
///
/// The exporter owns the tile fetcher (and with it the download pool) and
/// can be shared between threads; every call is independent.
///
/// # Example
///
/// ```ignore
/// let exporter = MapExporter::new(territories, fetcher, OverlayRenderer::new(font));
/// let png = exporter.export_png(&ExportRequest::default())?;
/// std::fs::write("map.png", png)?;
/// ```
pub struct MapExporter {
    territories: Arc<dyn TerritoryDataProvider>,
    fetcher: MosaicFetcher,
    overlay: OverlayRenderer,
    margin: f64,
}

impl MapExporter {
    /// Creates an exporter with the default margin.
    ///
    /// # Arguments
    ///
    /// * `territories` - Source of territory geometries
    /// * `fetcher` - Base map tile fetcher
    /// * `overlay` - Boundary and label renderer
    pub fn new(
        territories: Arc<dyn TerritoryDataProvider>,
        fetcher: MosaicFetcher,
        overlay: OverlayRenderer,
    ) -> Self {
        Self {
            territories,
            fetcher,
            overlay,
            margin: DEFAULT_MARGIN,
        }
    }

    /// Sets the margin fraction. Negative or non-finite values mean no margin.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
        self
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Renders the requested map as PNG bytes.
    ///
    /// The image is always exactly the page size of `request`. When no
    /// territory matches, the page is fully transparent.
    pub fn export_png(&self, request: &ExportRequest) -> Result<Vec<u8>, ExportError> {
        self.export_png_with_cancel(request, &CancellationToken::new())
    }

    /// Like [`export_png`](Self::export_png), aborting with
    /// [`ExportError::Cancelled`] once `cancel` fires.
    pub fn export_png_with_cancel(
        &self,
        request: &ExportRequest,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ExportError> {
        let start = Instant::now();
        let (width, height) = request.canvas_size();
        let mut canvas = Canvas::new(width, height)?;
        debug!(
            paper = %request.paper,
            orientation = %request.orientation,
            width,
            height,
            "Canvas created"
        );

        let set = self.territories.fetch(request.region.as_deref())?;
        let bbox = match set.bbox {
            Some(bbox) if !set.is_empty() => bbox,
            _ => {
                info!(
                    region = request.region.as_deref().unwrap_or("*"),
                    "No territories to export, writing blank page"
                );
                return Ok(canvas.encode_png()?);
            }
        };
        debug!(
            territories = set.records.len(),
            source = self.territories.name(),
            bbox = %bbox,
            "Territories loaded"
        );

        let boundaries = set
            .records
            .iter()
            .map(|record| {
                BoundaryRecord::decode(record).map_err(|source| ExportError::Geometry {
                    name: record.name.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let extent = self.map_extent(&bbox, request.zoom);
        let mosaic = self
            .fetcher
            .fetch_mosaic_with_cancel(&extent, request.zoom, cancel)
            .map_err(|e| match e {
                MosaicError::Cancelled => ExportError::Cancelled,
                other => ExportError::Mosaic(other),
            })?;
        let placeholder_tiles = mosaic.placeholder_tiles;
        let tiles = mosaic.range.tile_count();

        let cropped = mosaic::crop(&mosaic, &extent);
        drop(mosaic);
        debug!(
            width = cropped.pixel_width,
            height = cropped.pixel_height,
            "Base map cropped"
        );

        let placement = Placement::fit(cropped.pixel_width, cropped.pixel_height, width, height);
        canvas.draw_image(
            &cropped.image,
            placement.pad_x,
            placement.pad_y,
            placement.draw_width,
            placement.draw_height,
        );
        debug!(
            scale = placement.scale,
            pad_x = placement.pad_x,
            pad_y = placement.pad_y,
            "Base map placed"
        );

        if cancel.is_cancelled() {
            return Err(ExportError::Cancelled);
        }

        let mapping = AffineMapping::from_placement(&cropped.envelope, &placement);
        self.overlay
            .render(&mut canvas, &mapping, &boundaries, request.draw_labels);

        let png = canvas.encode_png()?;
        info!(
            territories = boundaries.len(),
            tiles,
            placeholder_tiles,
            width,
            height,
            bytes = png.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Map exported"
        );
        Ok(png)
    }

    /// Territory bbox grown by the margin. A bbox without area (a single
    /// point or a straight line) gets another half tile on every side.
    fn map_extent(&self, bbox: &GeoEnvelope, zoom: i32) -> GeoEnvelope {
        let extent = bbox.to_web_mercator().expand_by_fraction(self.margin);
        if !extent.is_degenerate() {
            return extent;
        }

        let half_tile = TILE_SIZE as f64 * resolution(clamp_zoom(zoom)) / 2.0;
        extent.expand_by(half_tile, half_tile)
    }
}

//! Parallel tile download and mosaic assembly

use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use rayon::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::error::MosaicError;
use super::types::{Mosaic, TileRaster};
use crate::coord::{clamp_zoom, GeoEnvelope, TileIndex, TileRange, TILE_SIZE};
use crate::provider::TileSource;

/// Default number of concurrent tile downloads.
pub const DEFAULT_MAX_PARALLEL: usize = 8;

/// Upper bound on tiles in one mosaic (64×64 tiles, 1 GiB of RGBA).
pub const MAX_MOSAIC_TILES: usize = 4096;

/// Bytes in one pixel row of a tile.
const TILE_ROW_BYTES: usize = TILE_SIZE as usize * 4;

/// Result of one worker.
enum TileOutcome {
    Pasted,
    Failed { error: String, connection: bool },
    Skipped,
}

/// A tile's 256 pixel-row slices inside the mosaic buffer.
struct TileRegion<'a> {
    tile: TileIndex,
    rows: Vec<&'a mut [u8]>,
}

impl TileRegion<'_> {
    fn paste(&mut self, raster: &TileRaster) {
        for (dst, src) in self.rows.iter_mut().zip(raster.image.chunks(TILE_ROW_BYTES)) {
            dst.copy_from_slice(src);
        }
    }
}

/// Splits a row-major RGBA buffer of `range` into one disjoint region per
/// tile, in the same order as [`TileRange::tiles`].
fn tile_regions<'a>(buffer: &'a mut [u8], range: &TileRange) -> Vec<TileRegion<'a>> {
    let cols = range.cols() as usize;
    let mut regions: Vec<TileRegion<'a>> = range
        .tiles()
        .map(|tile| TileRegion {
            tile,
            rows: Vec::with_capacity(TILE_SIZE as usize),
        })
        .collect();

    for (y, line) in buffer.chunks_mut(cols * TILE_ROW_BYTES).enumerate() {
        let tile_row = y / TILE_SIZE as usize;
        for (col, segment) in line.chunks_mut(TILE_ROW_BYTES).enumerate() {
            regions[tile_row * cols + col].rows.push(segment);
        }
    }
    regions
}

/// Downloads the tiles covering an envelope and stitches them together.
///
/// Tiles are fetched on a dedicated, bounded rayon pool that lives as long
/// as the fetcher. The mosaic is allocated up front and each worker decodes
/// straight into its own disjoint 256×256 region, so completion order never
/// matters and at most one decoded tile per worker is alive at a time.
///
/// # Example
///
/// ```ignore
/// use printmap::mosaic::MosaicFetcher;
/// use printmap::provider::{ReqwestClient, TileSource, WmtsLayer, WmtsProvider};
/// use std::sync::Arc;
///
/// let source: Arc<dyn TileSource> =
///     Arc::new(WmtsProvider::new(ReqwestClient::new()?, WmtsLayer::default())?);
/// let fetcher = MosaicFetcher::new(source, 8)?;
/// let mosaic = fetcher.fetch_mosaic(&envelope, 14)?;
/// ```
pub struct MosaicFetcher {
    source: Arc<dyn TileSource>,
    pool: rayon::ThreadPool,
    max_parallel: usize,
}

impl MosaicFetcher {
    /// Creates a new fetcher.
    ///
    /// # Arguments
    ///
    /// * `source` - Tile source to download from (as trait object)
    /// * `max_parallel` - Maximum number of concurrent downloads (at least 1)
    pub fn new(source: Arc<dyn TileSource>, max_parallel: usize) -> Result<Self, MosaicError> {
        let max_parallel = max_parallel.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_parallel)
            .thread_name(|i| format!("printmap-fetch-{}", i))
            .build()
            .map_err(|e| MosaicError::ThreadPool(e.to_string()))?;

        Ok(Self {
            source,
            pool,
            max_parallel,
        })
    }

    pub fn max_parallel(&self) -> usize {
        self.max_parallel
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Fetches the mosaic covering `envelope` at `zoom`.
    ///
    /// # Arguments
    ///
    /// * `envelope` - Area to cover, in WGS84 or Web Mercator
    /// * `zoom` - Requested zoom, clamped to 0..=19
    ///
    /// # Returns
    ///
    /// The grid-aligned mosaic. Individual tile failures become grey
    /// placeholders; the call only fails when every tile failed to connect.
    pub fn fetch_mosaic(&self, envelope: &GeoEnvelope, zoom: i32) -> Result<Mosaic, MosaicError> {
        self.fetch_mosaic_with_cancel(envelope, zoom, &CancellationToken::new())
    }

    /// Like [`fetch_mosaic`](Self::fetch_mosaic), stopping early once
    /// `cancel` fires. A cancelled fetch discards the partial mosaic.
    pub fn fetch_mosaic_with_cancel(
        &self,
        envelope: &GeoEnvelope,
        zoom: i32,
        cancel: &CancellationToken,
    ) -> Result<Mosaic, MosaicError> {
        let start = Instant::now();
        let range = TileRange::covering(envelope, clamp_zoom(zoom));

        if range.tile_count() > MAX_MOSAIC_TILES {
            return Err(MosaicError::TooLarge {
                cols: range.cols(),
                rows: range.rows(),
                max: MAX_MOSAIC_TILES,
            });
        }

        debug!(
            zoom = range.zoom,
            cols = range.cols(),
            rows = range.rows(),
            source = self.source.name(),
            "Fetching mosaic"
        );

        let mut image = RgbaImage::new(range.pixel_width(), range.pixel_height());
        let regions = tile_regions(&mut image, &range);
        let attempted = regions.len();
        let outcomes: Vec<TileOutcome> = self.pool.install(|| {
            regions
                .into_par_iter()
                .map(|mut region| self.fetch_into(&mut region, cancel))
                .collect()
        });

        if cancel.is_cancelled() {
            debug!("Mosaic fetch cancelled, discarding partial result");
            return Err(MosaicError::Cancelled);
        }

        let mut unreachable = 0;
        let mut placeholder_tiles = 0;
        let mut last_error = String::new();
        for outcome in &outcomes {
            if let TileOutcome::Failed { error, connection } = outcome {
                if *connection {
                    unreachable += 1;
                }
                last_error.clone_from(error);
            }
            if !matches!(outcome, TileOutcome::Pasted) {
                placeholder_tiles += 1;
            }
        }
        if unreachable == attempted {
            return Err(MosaicError::EndpointUnreachable {
                attempted,
                last_error,
            });
        }

        debug!(
            tiles = attempted,
            placeholders = placeholder_tiles,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Mosaic assembled"
        );

        Ok(Mosaic {
            image,
            envelope: range.envelope(),
            pixel_width: range.pixel_width(),
            pixel_height: range.pixel_height(),
            range,
            placeholder_tiles,
        })
    }

    /// Fetches one tile and writes it, or the placeholder, into `region`.
    fn fetch_into(&self, region: &mut TileRegion<'_>, cancel: &CancellationToken) -> TileOutcome {
        let tile = region.tile;
        if cancel.is_cancelled() {
            return TileOutcome::Skipped;
        }

        let failure = match self.source.fetch_tile(&tile) {
            Ok(data) => match TileRaster::decode(tile, &data) {
                Ok(raster) => {
                    region.paste(&raster);
                    return TileOutcome::Pasted;
                }
                Err(error) => {
                    warn!(tile = %tile, error = %error, "Tile decode failed, using placeholder");
                    TileOutcome::Failed {
                        error,
                        connection: false,
                    }
                }
            },
            Err(e) => {
                warn!(tile = %tile, error = %e, "Tile fetch failed, using placeholder");
                TileOutcome::Failed {
                    error: e.to_string(),
                    connection: e.is_connection_error(),
                }
            }
        };

        region.paste(&TileRaster::placeholder(tile));
        failure
    }
}

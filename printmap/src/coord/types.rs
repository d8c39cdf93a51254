//! Coordinate type definitions

use std::fmt;

/// Half the width of the Web Mercator world, in meters.
pub const ORIGIN_SHIFT: f64 = 20037508.342789244;

/// Spherical Mercator earth radius, in meters.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Edge length of one WMTS tile, in pixels.
pub const TILE_SIZE: u32 = 256;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Zoom levels exposed by the "PM" tile matrix set
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 19;

/// Coordinate reference system of an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Crs {
    /// Geographic WGS84 (EPSG:4326), degrees.
    Wgs84,
    /// Spherical Web Mercator (EPSG:3857), meters.
    WebMercator,
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Wgs84 => write!(f, "EPSG:4326"),
            Crs::WebMercator => write!(f, "EPSG:3857"),
        }
    }
}

/// Axis-aligned bounding box in a given CRS.
///
/// `min_x <= max_x` and `min_y <= max_y` always hold: [`GeoEnvelope::new`]
/// orders its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoEnvelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub crs: Crs,
}

impl GeoEnvelope {
    /// Creates an envelope from two opposite corners.
    pub fn new(crs: Crs, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
            crs,
        }
    }

    /// Shorthand for an EPSG:3857 envelope.
    pub fn web_mercator(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Crs::WebMercator, min_x, min_y, max_x, max_y)
    }

    /// Shorthand for an EPSG:4326 envelope (longitudes as x, latitudes as y).
    pub fn wgs84(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self::new(Crs::Wgs84, min_lon, min_lat, max_lon, max_lat)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// True when the envelope has no area.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Grows the envelope by `fraction` of its width/height on each side.
    pub fn expand_by_fraction(&self, fraction: f64) -> Self {
        self.expand_by(self.width() * fraction, self.height() * fraction)
    }

    /// Grows the envelope by fixed distances on each side.
    pub fn expand_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
            crs: self.crs,
        }
    }

    /// Smallest envelope containing both. The CRS of `self` is kept.
    pub fn union(&self, other: &GeoEnvelope) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
            crs: self.crs,
        }
    }

    /// True when `other` lies entirely inside this envelope.
    pub fn contains(&self, other: &GeoEnvelope) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Returns the envelope in EPSG:3857 meters.
    ///
    /// Latitudes are clamped to the Web Mercator validity range.
    pub fn to_web_mercator(&self) -> Self {
        match self.crs {
            Crs::WebMercator => *self,
            Crs::Wgs84 => Self::web_mercator(
                super::lon_to_meters_x(self.min_x),
                super::lat_to_meters_y(self.min_y),
                super::lon_to_meters_x(self.max_x),
                super::lat_to_meters_y(self.max_y),
            ),
        }
    }
}

impl fmt::Display for GeoEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.3}, {:.3}, {:.3}, {:.3}] ({})",
            self.min_x, self.min_y, self.max_x, self.max_y, self.crs
        )
    }
}

/// Tile address in the "PM" tile matrix set.
///
/// `col` increases eastward, `row` increases southward, both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    /// Zoom level (0-19)
    pub zoom: u8,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
}

impl TileIndex {
    pub fn new(zoom: u8, col: u32, row: u32) -> Self {
        Self { zoom, col, row }
    }

    /// Exact EPSG:3857 bounds of this tile.
    #[inline]
    pub fn bounds(&self) -> GeoEnvelope {
        super::tile_bounds_meters(self.col as i64, self.row as i64, self.zoom)
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.row, self.col)
    }
}

/// Inclusive rectangle of tiles covering an envelope at one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub zoom: u8,
    pub col_min: u32,
    pub col_max: u32,
    pub row_min: u32,
    pub row_max: u32,
}

impl TileRange {
    /// Computes the tiles covering `envelope` at `zoom`.
    ///
    /// The zoom is clamped to the supported range and every index is clamped
    /// into the tile matrix, so the result is always a valid grid.
    pub fn covering(envelope: &GeoEnvelope, zoom: u8) -> Self {
        let zoom = zoom.min(MAX_ZOOM);
        let (col_a, col_b, row_top, row_bottom) = match envelope.crs {
            Crs::Wgs84 => (
                super::lon_to_tile_col(envelope.min_x, zoom),
                super::lon_to_tile_col(envelope.max_x, zoom),
                // Northern edge has the smallest row index
                super::lat_to_tile_row(envelope.max_y, zoom),
                super::lat_to_tile_row(envelope.min_y, zoom),
            ),
            Crs::WebMercator => (
                super::meters_to_tile_col(envelope.min_x, zoom),
                super::meters_to_tile_col(envelope.max_x, zoom),
                super::meters_to_tile_row(envelope.max_y, zoom),
                super::meters_to_tile_row(envelope.min_y, zoom),
            ),
        };

        let last = (1i64 << zoom) - 1;
        let clamp = |v: i64| v.clamp(0, last) as u32;

        Self {
            zoom,
            col_min: clamp(col_a),
            col_max: clamp(col_b),
            row_min: clamp(row_top),
            row_max: clamp(row_bottom),
        }
    }

    pub fn cols(&self) -> u32 {
        self.col_max - self.col_min + 1
    }

    pub fn rows(&self) -> u32 {
        self.row_max - self.row_min + 1
    }

    pub fn tile_count(&self) -> usize {
        self.cols() as usize * self.rows() as usize
    }

    pub fn pixel_width(&self) -> u32 {
        self.cols() * TILE_SIZE
    }

    pub fn pixel_height(&self) -> u32 {
        self.rows() * TILE_SIZE
    }

    /// Grid-aligned EPSG:3857 envelope of the whole range.
    pub fn envelope(&self) -> GeoEnvelope {
        let top_left = TileIndex::new(self.zoom, self.col_min, self.row_min).bounds();
        let bottom_right = TileIndex::new(self.zoom, self.col_max, self.row_max).bounds();
        top_left.union(&bottom_right)
    }

    /// Pixel offset of `tile` inside a mosaic built from this range.
    pub fn pixel_offset(&self, tile: &TileIndex) -> (u32, u32) {
        (
            (tile.col - self.col_min) * TILE_SIZE,
            (tile.row - self.row_min) * TILE_SIZE,
        )
    }

    /// Iterates the tiles in row-major order.
    pub fn tiles(&self) -> TileRangeIter {
        TileRangeIter {
            range: *self,
            current: 0,
        }
    }
}

/// Row-major iterator over a [`TileRange`].
#[derive(Debug, Clone)]
pub struct TileRangeIter {
    range: TileRange,
    current: usize,
}

impl Iterator for TileRangeIter {
    type Item = TileIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.range.tile_count() {
            return None;
        }

        let cols = self.range.cols() as usize;
        let row = self.range.row_min + (self.current / cols) as u32;
        let col = self.range.col_min + (self.current % cols) as u32;
        self.current += 1;

        Some(TileIndex::new(self.range.zoom, col, row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.tile_count() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TileRangeIter {}

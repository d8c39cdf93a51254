//! Web Mercator tiling math
//!
//! Conversions between geographic coordinates (WGS84 degrees), spherical
//! Web Mercator meters (EPSG:3857) and tile indices of the WMTS "PM" tile
//! matrix set. Everything here is pure and never fails: callers clamp zoom
//! levels and tile indices themselves.

mod types;

pub use types::{
    Crs, GeoEnvelope, TileIndex, TileRange, TileRangeIter, EARTH_RADIUS, MAX_LAT, MAX_ZOOM,
    MIN_LAT, MIN_ZOOM, ORIGIN_SHIFT, TILE_SIZE,
};

use std::f64::consts::PI;

/// Ground resolution in meters per pixel at a zoom level.
///
/// Zoom 0 covers the whole world with a single 256×256 tile.
#[inline]
pub fn resolution(zoom: u8) -> f64 {
    (2.0 * ORIGIN_SHIFT) / (TILE_SIZE as f64 * 2.0_f64.powi(zoom as i32))
}

/// Clamps an arbitrary requested zoom into the supported range.
#[inline]
pub fn clamp_zoom(zoom: i32) -> u8 {
    zoom.clamp(MIN_ZOOM as i32, MAX_ZOOM as i32) as u8
}

/// Projects a longitude in degrees to a Web Mercator X in meters.
#[inline]
pub fn lon_to_meters_x(lon: f64) -> f64 {
    lon * PI / 180.0 * EARTH_RADIUS
}

/// Projects a latitude in degrees to a Web Mercator Y in meters.
///
/// The latitude is clamped to ±[`MAX_LAT`] first.
#[inline]
pub fn lat_to_meters_y(lat: f64) -> f64 {
    let lat = lat.clamp(MIN_LAT, MAX_LAT);
    let phi = lat * PI / 180.0;
    (PI / 4.0 + phi / 2.0).tan().ln() * EARTH_RADIUS
}

/// Inverse projection from Web Mercator meters to `(lon, lat)` degrees.
pub fn meters_to_lon_lat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS) * 180.0 / PI;
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - PI / 2.0) * 180.0 / PI;
    (lon, lat)
}

/// Tile column containing a Web Mercator X.
///
/// May fall outside `[0, 2^zoom)` for inputs outside the world extent.
#[inline]
pub fn meters_to_tile_col(x: f64, zoom: u8) -> i64 {
    let span = TILE_SIZE as f64 * resolution(zoom);
    ((x + ORIGIN_SHIFT) / span).floor() as i64
}

/// Tile row containing a Web Mercator Y. Row 0 is the northern edge.
#[inline]
pub fn meters_to_tile_row(y: f64, zoom: u8) -> i64 {
    let span = TILE_SIZE as f64 * resolution(zoom);
    ((ORIGIN_SHIFT - y) / span).floor() as i64
}

/// Tile column containing a longitude.
///
/// # Arguments
///
/// * `lon` - Longitude in degrees
/// * `zoom` - Zoom level, expected in `0..=19`
#[inline]
pub fn lon_to_tile_col(lon: f64, zoom: u8) -> i64 {
    meters_to_tile_col(lon_to_meters_x(lon), zoom)
}

/// Tile row containing a latitude.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees, clamped to ±85.05112878
/// * `zoom` - Zoom level, expected in `0..=19`
///
/// # Returns
///
/// The row index. At the clamped poles rounding can push the result one
/// step outside the matrix, so range computations clamp it afterwards.
#[inline]
pub fn lat_to_tile_row(lat: f64, zoom: u8) -> i64 {
    meters_to_tile_row(lat_to_meters_y(lat), zoom)
}

/// Exact EPSG:3857 bounds of a tile.
pub fn tile_bounds_meters(col: i64, row: i64, zoom: u8) -> GeoEnvelope {
    let span = TILE_SIZE as f64 * resolution(zoom);
    let min_x = col as f64 * span - ORIGIN_SHIFT;
    let max_y = ORIGIN_SHIFT - row as f64 * span;
    GeoEnvelope::web_mercator(min_x, max_y - span, min_x + span, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_resolution_reference_values() {
        assert!((resolution(0) - 156543.03392804097).abs() < EPSILON);
        assert!((resolution(14) - 9.554628535647032).abs() < EPSILON);
        assert!((resolution(19) - 0.29858214173896974).abs() < EPSILON);
    }

    #[test]
    fn test_paris_at_zoom_14() {
        assert_eq!(lon_to_tile_col(2.3522, 14), 8299);
        assert_eq!(lat_to_tile_row(48.8566, 14), 5636);
    }

    #[test]
    fn test_new_york_city_at_zoom_16() {
        assert_eq!(lon_to_tile_col(-74.0060, 16), 19295);
        assert_eq!(lat_to_tile_row(40.7128, 16), 24640);
    }

    #[test]
    fn test_floor_not_truncation() {
        // Just east of the antimeridian split at zoom 1
        assert_eq!(lon_to_tile_col(0.0001, 1), 1);
        assert_eq!(lon_to_tile_col(-0.0001, 1), 0);
        assert_eq!(lat_to_tile_row(0.0001, 1), 0);
        assert_eq!(lat_to_tile_row(-0.0001, 1), 1);
    }

    #[test]
    fn test_paris_meters() {
        assert!((lon_to_meters_x(2.3522) - 261845.70624393807).abs() < 1e-3);
        assert!((lat_to_meters_y(48.8566) - 6250564.349543127).abs() < 1e-3);
    }

    #[test]
    fn test_latitude_clamped_beyond_mercator_range() {
        assert_eq!(lat_to_meters_y(90.0), lat_to_meters_y(MAX_LAT));
        assert_eq!(lat_to_meters_y(-90.0), lat_to_meters_y(MIN_LAT));
    }

    #[test]
    fn test_meters_to_lon_lat_inverts_projection() {
        let (lon, lat) = meters_to_lon_lat(lon_to_meters_x(2.3522), lat_to_meters_y(48.8566));
        assert!((lon - 2.3522).abs() < 1e-9);
        assert!((lat - 48.8566).abs() < 1e-9);
    }

    #[test]
    fn test_world_tile_bounds() {
        let world = tile_bounds_meters(0, 0, 0);
        assert!((world.min_x + ORIGIN_SHIFT).abs() < EPSILON);
        assert!((world.max_x - ORIGIN_SHIFT).abs() < EPSILON);
        assert!((world.min_y + ORIGIN_SHIFT).abs() < EPSILON);
        assert!((world.max_y - ORIGIN_SHIFT).abs() < EPSILON);
        assert_eq!(world.crs, Crs::WebMercator);
    }

    #[test]
    fn test_clamp_zoom() {
        assert_eq!(clamp_zoom(-3), 0);
        assert_eq!(clamp_zoom(0), 0);
        assert_eq!(clamp_zoom(14), 14);
        assert_eq!(clamp_zoom(19), 19);
        assert_eq!(clamp_zoom(42), 19);
    }

    #[test]
    fn test_envelope_normalises_corners() {
        let env = GeoEnvelope::web_mercator(10.0, 20.0, -10.0, -20.0);
        assert_eq!(env.min_x, -10.0);
        assert_eq!(env.max_x, 10.0);
        assert_eq!(env.min_y, -20.0);
        assert_eq!(env.max_y, 20.0);
        assert_eq!(env.width(), 20.0);
        assert_eq!(env.height(), 40.0);
    }

    #[test]
    fn test_envelope_expand_by_fraction() {
        let env = GeoEnvelope::web_mercator(0.0, 0.0, 100.0, 200.0).expand_by_fraction(0.03);
        assert!((env.min_x + 3.0).abs() < EPSILON);
        assert!((env.max_x - 103.0).abs() < EPSILON);
        assert!((env.min_y + 6.0).abs() < EPSILON);
        assert!((env.max_y - 206.0).abs() < EPSILON);
    }

    #[test]
    fn test_envelope_union_and_contains() {
        let a = GeoEnvelope::web_mercator(0.0, 0.0, 10.0, 10.0);
        let b = GeoEnvelope::web_mercator(5.0, -5.0, 20.0, 5.0);
        let u = a.union(&b);
        assert_eq!(u, GeoEnvelope::web_mercator(0.0, -5.0, 20.0, 10.0));
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        assert!(!a.contains(&b));
    }

    #[test]
    fn test_wgs84_envelope_to_web_mercator() {
        let env = GeoEnvelope::wgs84(2.3522, 48.8566, 2.3522, 48.8566).to_web_mercator();
        assert_eq!(env.crs, Crs::WebMercator);
        assert!((env.min_x - 261845.70624393807).abs() < 1e-3);
        assert!((env.min_y - 6250564.349543127).abs() < 1e-3);
        assert!(env.is_degenerate());
    }

    #[test]
    fn test_range_inside_one_tile() {
        let tile = tile_bounds_meters(8299, 5636, 14);
        let inner = tile.expand_by(-10.0, -10.0);
        let range = TileRange::covering(&inner, 14);

        assert_eq!(range.cols(), 1);
        assert_eq!(range.rows(), 1);
        assert_eq!(range.pixel_width(), 256);
        assert_eq!(range.pixel_height(), 256);
        assert_eq!(range.col_min, 8299);
        assert_eq!(range.row_min, 5636);
    }

    #[test]
    fn test_range_wgs84_max_lat_maps_to_min_row() {
        let env = GeoEnvelope::wgs84(2.0, 48.0, 3.0, 49.0);
        let range = TileRange::covering(&env, 10);
        assert_eq!(range.row_min as i64, lat_to_tile_row(49.0, 10));
        assert_eq!(range.row_max as i64, lat_to_tile_row(48.0, 10));
        assert!(range.row_min < range.row_max);
    }

    #[test]
    fn test_range_clamps_to_matrix() {
        let world = GeoEnvelope::wgs84(-180.0, -90.0, 180.0, 90.0);

        let z0 = TileRange::covering(&world, 0);
        assert_eq!(z0.tile_count(), 1);

        let z3 = TileRange::covering(&world, 3);
        assert_eq!(z3.col_min, 0);
        assert_eq!(z3.row_min, 0);
        assert_eq!(z3.col_max, 7);
        assert_eq!(z3.row_max, 7);
    }

    #[test]
    fn test_range_clamps_zoom() {
        let env = GeoEnvelope::web_mercator(0.0, 0.0, 1.0, 1.0);
        assert_eq!(TileRange::covering(&env, 25).zoom, MAX_ZOOM);
    }

    #[test]
    fn test_range_tiles_row_major() {
        let range = TileRange {
            zoom: 5,
            col_min: 3,
            col_max: 5,
            row_min: 10,
            row_max: 11,
        };
        let tiles: Vec<_> = range.tiles().collect();

        assert_eq!(tiles.len(), 6);
        assert_eq!(range.tiles().len(), 6);
        assert_eq!(tiles[0], TileIndex::new(5, 3, 10));
        assert_eq!(tiles[2], TileIndex::new(5, 5, 10));
        assert_eq!(tiles[3], TileIndex::new(5, 3, 11));
        assert_eq!(tiles[5], TileIndex::new(5, 5, 11));
        assert_eq!(range.pixel_offset(&tiles[4]), (256, 256));
    }

    #[test]
    fn test_range_envelope_is_grid_aligned() {
        let env = GeoEnvelope::wgs84(2.30, 48.82, 2.40, 48.90);
        let range = TileRange::covering(&env, 14);
        let grid = range.envelope();
        let span = TILE_SIZE as f64 * resolution(14);

        assert!(grid.contains(&env.to_web_mercator()));
        assert!((grid.width() - range.cols() as f64 * span).abs() < 1e-3);
        assert!((grid.height() - range.rows() as f64 * span).abs() < 1e-3);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_tile_bounds_size_matches_resolution(
                zoom in 0u8..=19,
                col_frac in 0.0..1.0_f64,
                row_frac in 0.0..1.0_f64
            ) {
                let n = 1i64 << zoom;
                let col = ((n as f64 * col_frac) as i64).min(n - 1);
                let row = ((n as f64 * row_frac) as i64).min(n - 1);
                let bounds = tile_bounds_meters(col, row, zoom);
                let span = 256.0 * resolution(zoom);

                prop_assert!((bounds.width() - span).abs() < 1e-6);
                prop_assert!((bounds.height() - span).abs() < 1e-6);
            }

            #[test]
            fn test_adjacent_tiles_share_edges(
                zoom in 1u8..=19,
                col_frac in 0.0..1.0_f64,
                row_frac in 0.0..1.0_f64
            ) {
                let n = 1i64 << zoom;
                let col = ((n as f64 * col_frac) as i64).min(n - 2);
                let row = ((n as f64 * row_frac) as i64).min(n - 2);
                let here = tile_bounds_meters(col, row, zoom);
                let east = tile_bounds_meters(col + 1, row, zoom);
                let south = tile_bounds_meters(col, row + 1, zoom);

                prop_assert!((here.max_x - east.min_x).abs() < 1e-6);
                prop_assert!((here.min_y - south.max_y).abs() < 1e-6);
            }

            #[test]
            fn test_col_monotonic_in_longitude(
                lon1 in -180.0..180.0_f64,
                lon2 in -180.0..180.0_f64,
                zoom in 0u8..=19
            ) {
                let (lo, hi) = if lon1 <= lon2 { (lon1, lon2) } else { (lon2, lon1) };
                prop_assert!(lon_to_tile_col(lo, zoom) <= lon_to_tile_col(hi, zoom));
            }

            #[test]
            fn test_row_monotonic_in_latitude(
                lat1 in -85.0..85.0_f64,
                lat2 in -85.0..85.0_f64,
                zoom in 0u8..=19
            ) {
                let (lo, hi) = if lat1 <= lat2 { (lat1, lat2) } else { (lat2, lat1) };
                // Northern latitudes map to smaller rows
                prop_assert!(lat_to_tile_row(hi, zoom) <= lat_to_tile_row(lo, zoom));
            }

            #[test]
            fn test_covering_range_within_matrix(
                lon1 in -200.0..200.0_f64,
                lon2 in -200.0..200.0_f64,
                lat1 in -90.0..90.0_f64,
                lat2 in -90.0..90.0_f64,
                zoom in 0u8..=19
            ) {
                let range = TileRange::covering(&GeoEnvelope::wgs84(lon1, lat1, lon2, lat2), zoom);
                let n = 1u32 << zoom;

                prop_assert!(range.col_min <= range.col_max);
                prop_assert!(range.row_min <= range.row_max);
                prop_assert!(range.col_max < n);
                prop_assert!(range.row_max < n);
            }
        }
    }
}

//! Integration tests for the map export pipeline.
//!
//! A fake WMTS endpoint answers `GetTile` requests with solid-colour tiles
//! so the whole flow (WMTS URLs → mosaic → crop → letterbox → overlay →
//! PNG) runs without network access.
//!
//! Run with: `cargo test --test export_integration`

use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use geo_types::{LineString, MultiPolygon, Point, Polygon};
use image::{ImageFormat, Rgba, RgbaImage};

use printmap::coord::{tile_bounds_meters, GeoEnvelope};
use printmap::export::{ExportError, ExportRequest, MapExporter};
use printmap::geometry::{write_multi_polygon, write_point};
use printmap::mosaic::{MosaicError, MosaicFetcher, PLACEHOLDER_COLOR};
use printmap::page::{Orientation, PaperSize};
use printmap::provider::{HttpClient, ProviderError, WmtsLayer, WmtsProvider};
use printmap::render::{LabelFont, OverlayRenderer};
use printmap::territory::{
    GeoJsonTerritoryProvider, InMemoryTerritoryProvider, TerritoryDataProvider, TerritoryRecord,
};

// ============================================================================
// Fake WMTS endpoint
// ============================================================================

/// Zoom 10 block of 3×3 tiles used throughout.
const ZOOM: i32 = 10;
const COL_MIN: i64 = 500;
const ROW_MIN: i64 = 300;

enum Failure {
    Status(u16),
    Refused,
}

struct FakeWmts {
    failing: HashSet<(u32, u32)>,
    failure: Option<Failure>,
    refuse_all: bool,
    requests: Mutex<Vec<String>>,
}

impl FakeWmts {
    fn healthy() -> Self {
        Self {
            failing: HashSet::new(),
            failure: None,
            refuse_all: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing_tile(col: u32, row: u32, failure: Failure) -> Self {
        Self {
            failing: HashSet::from([(col, row)]),
            failure: Some(failure),
            ..Self::healthy()
        }
    }

    fn unreachable() -> Self {
        Self {
            refuse_all: true,
            ..Self::healthy()
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

fn query_value(url: &str, key: &str) -> u32 {
    url.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix(key)?.strip_prefix('='))
        .and_then(|v| v.parse().ok())
        .unwrap()
}

fn tile_color(col: u32, row: u32) -> [u8; 4] {
    [(col % 50) as u8 * 5, (row % 50) as u8 * 5, 90, 255]
}

fn png_tile(color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(256, 256, Rgba(color));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

impl HttpClient for FakeWmts {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.requests.lock().unwrap().push(url.to_string());
        if self.refuse_all {
            return Err(ProviderError::Connection("connection refused".to_string()));
        }

        let col = query_value(url, "TILECOL");
        let row = query_value(url, "TILEROW");
        if self.failing.contains(&(col, row)) {
            return Err(match self.failure {
                Some(Failure::Status(status)) => ProviderError::HttpStatus {
                    status,
                    url: url.to_string(),
                },
                _ => ProviderError::Connection("connection reset".to_string()),
            });
        }
        Ok(png_tile(tile_color(col, row)))
    }
}

/// Lets a test keep a handle on the endpoint the provider owns.
struct Shared(Arc<FakeWmts>);

impl HttpClient for Shared {
    fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        self.0.get(url)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn fetcher(http: FakeWmts) -> (MosaicFetcher, Arc<FakeWmts>) {
    let http = Arc::new(http);
    let source = WmtsProvider::new(Shared(http.clone()), WmtsLayer::default()).unwrap();
    let fetcher = MosaicFetcher::new(Arc::new(source), 4).unwrap();
    (fetcher, http)
}

fn exporter(
    territories: impl TerritoryDataProvider + 'static,
    http: FakeWmts,
) -> (MapExporter, Arc<FakeWmts>) {
    let (fetcher, http) = fetcher(http);
    let overlay = OverlayRenderer::new(LabelFont::embedded(18.0).unwrap());
    (
        MapExporter::new(Arc::new(territories), fetcher, overlay),
        http,
    )
}

/// Envelope strictly inside the 3×3 block.
fn block_envelope() -> GeoEnvelope {
    tile_bounds_meters(COL_MIN, ROW_MIN, ZOOM as u8)
        .union(&tile_bounds_meters(COL_MIN + 2, ROW_MIN + 2, ZOOM as u8))
        .expand_by(-1.0, -1.0)
}

fn territory(name: &str, envelope: &GeoEnvelope, color: Option<&str>) -> TerritoryRecord {
    let ring = LineString::from(vec![
        (envelope.min_x, envelope.min_y),
        (envelope.max_x, envelope.min_y),
        (envelope.max_x, envelope.max_y),
        (envelope.min_x, envelope.max_y),
        (envelope.min_x, envelope.min_y),
    ]);
    TerritoryRecord {
        name: name.to_string(),
        boundary_wkb: write_multi_polygon(&MultiPolygon::new(vec![Polygon::new(ring, vec![])])),
        label_wkb: write_point(&Point::new(
            (envelope.min_x + envelope.max_x) / 2.0,
            (envelope.min_y + envelope.max_y) / 2.0,
        )),
        owner_color: color.map(str::to_string),
    }
}

fn request(dpi: u32) -> ExportRequest {
    ExportRequest {
        dpi,
        zoom: ZOOM,
        ..ExportRequest::default()
    }
}

fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory_with_format(png, ImageFormat::Png)
        .unwrap()
        .to_rgba8()
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_zero_territories_give_transparent_page() {
    let (exporter, http) = exporter(InMemoryTerritoryProvider::new(), FakeWmts::healthy());

    let image = decode(&exporter.export_png(&request(30)).unwrap());

    assert_eq!(image.dimensions(), (351, 248));
    assert!(image.pixels().all(|p| p.0[3] == 0));
    assert_eq!(http.request_count(), 0);
}

#[test]
fn test_page_sizes_follow_request() {
    let territories =
        InMemoryTerritoryProvider::new().with(None, territory("Block", &block_envelope(), None));
    let (exporter, _) = exporter(territories, FakeWmts::healthy());

    let portrait = ExportRequest {
        orientation: Orientation::Portrait,
        ..request(30)
    };
    assert_eq!(decode(&exporter.export_png(&portrait).unwrap()).dimensions(), (248, 351));

    let a3 = ExportRequest {
        paper: PaperSize::A3,
        ..request(30)
    };
    assert_eq!(decode(&exporter.export_png(&a3).unwrap()).dimensions(), (496, 351));
}

#[test]
fn test_failed_tile_becomes_placeholder() {
    let (fetcher, http) = fetcher(FakeWmts::failing_tile(501, 301, Failure::Status(500)));

    let mosaic = fetcher.fetch_mosaic(&block_envelope(), ZOOM).unwrap();

    assert_eq!(mosaic.pixel_width, 768);
    assert_eq!(mosaic.pixel_height, 768);
    assert_eq!(mosaic.placeholder_tiles, 1);
    assert_eq!(http.request_count(), 9);
    let requests = http.requests.lock().unwrap();
    assert!(requests
        .iter()
        .all(|url| url.starts_with("https://data.geopf.fr/wmts?SERVICE=WMTS&REQUEST=GetTile")));

    // Centre cell is grey, its neighbours keep their own content
    assert_eq!(mosaic.image.get_pixel(384, 384).0, PLACEHOLDER_COLOR.0);
    assert_eq!(mosaic.image.get_pixel(128, 128).0, tile_color(500, 300));
    assert_eq!(mosaic.image.get_pixel(640, 384).0, tile_color(502, 301));
    assert_eq!(mosaic.image.get_pixel(384, 640).0, tile_color(501, 302));
}

#[test]
fn test_export_with_failed_tile_keeps_dimensions() {
    let http = FakeWmts::failing_tile(501, 301, Failure::Status(500));
    let territories = InMemoryTerritoryProvider::new()
        .with(None, territory("Block", &block_envelope(), Some("#1A2B3C")));
    let (exporter, _) = exporter(territories, http);

    let image = decode(&exporter.export_png(&request(40)).unwrap());

    assert_eq!(image.dimensions(), (468, 331));
    let opaque = image.pixels().filter(|p| p.0[3] == 255).count();
    assert!(opaque > 300 * 300);
}

#[test]
fn test_single_connection_failure_is_tolerated() {
    let (fetcher, _) = fetcher(FakeWmts::failing_tile(500, 300, Failure::Refused));
    let mosaic = fetcher.fetch_mosaic(&block_envelope(), ZOOM).unwrap();
    assert_eq!(mosaic.placeholder_tiles, 1);
}

#[test]
fn test_unreachable_endpoint_fails_export() {
    let territories =
        InMemoryTerritoryProvider::new().with(None, territory("Block", &block_envelope(), None));
    let (exporter, http) = exporter(territories, FakeWmts::unreachable());

    // The margin pulls in one ring of neighbouring tiles: 5x5
    let err = exporter.export_png(&request(30)).unwrap_err();
    assert_eq!(http.request_count(), 25);
    match err {
        ExportError::Mosaic(MosaicError::EndpointUnreachable { attempted, .. }) => {
            assert_eq!(attempted, 25)
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_malformed_wkb_aborts_export() {
    let mut broken = territory("Broken", &block_envelope(), None);
    broken.boundary_wkb = vec![0x01, 0x03, 0x00];
    let territories = InMemoryTerritoryProvider::new()
        .with(None, territory("Block", &block_envelope(), None))
        .with(None, broken);

    let (exporter, http) = exporter(territories, FakeWmts::healthy());

    let err = exporter.export_png(&request(30)).unwrap_err();
    assert!(matches!(err, ExportError::Geometry { ref name, .. } if name == "Broken"));
    assert!(err.to_string().contains("Broken"));
    // Geometry is decoded before any tile is requested
    assert_eq!(http.request_count(), 0);
}

#[test]
fn test_region_filter() {
    let lyon = block_envelope();
    let paris = tile_bounds_meters(COL_MIN + 10, ROW_MIN, ZOOM as u8).expand_by(-1.0, -1.0);
    let territories = InMemoryTerritoryProvider::new()
        .with(Some("lyon"), territory("Lyon", &lyon, None))
        .with(Some("paris"), territory("Paris", &paris, None));

    let set = territories.fetch(Some("paris")).unwrap();
    assert_eq!(set.records.len(), 1);
    assert_eq!(set.records[0].name, "Paris");

    let (exporter, _) = exporter(territories, FakeWmts::healthy());
    let none = ExportRequest {
        region: Some("marseille".to_string()),
        ..request(30)
    };
    let image = decode(&exporter.export_png(&none).unwrap());
    assert!(image.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn test_geojson_file_export() {
    let doc = r##"{
      "type": "FeatureCollection",
      "features": [{
        "type": "Feature",
        "properties": { "name": "Presqu'île", "color": "#C04000", "region": "lyon" },
        "geometry": {
          "type": "Polygon",
          "coordinates": [[[4.82, 45.74], [4.85, 45.74], [4.85, 45.77], [4.82, 45.77], [4.82, 45.74]]]
        }
      }]
    }"##;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(doc.as_bytes()).unwrap();

    let territories = GeoJsonTerritoryProvider::from_path(file.path()).unwrap();
    let (exporter, http) = exporter(territories, FakeWmts::healthy());

    let request = ExportRequest {
        region: Some("lyon".to_string()),
        zoom: 13,
        ..request(30)
    };
    let image = decode(&exporter.export_png(&request).unwrap());

    assert_eq!(image.dimensions(), (351, 248));
    assert!(image.pixels().any(|p| p.0[3] == 255));
    assert!(http.request_count() > 0);
}

//! GeoJSON file territory provider.
//!
//! Reads a `FeatureCollection` of `Polygon` / `MultiPolygon` features in
//! WGS84 longitude/latitude. Recognised feature properties:
//!
//! | Property | Meaning |
//! |----------|---------|
//! | `name`   | Territory name (label text) |
//! | `color`  | Owner colour, `#RRGGBB` |
//! | `region` | Region identifier used for filtering (string or number) |
//! | `label`  | Optional `[lon, lat]` label anchor |
//!
//! Geometries are projected to EPSG:3857 and stored as WKB.

use std::path::Path;

use geo_types::{Coord, LineString, MultiPolygon, Point, Polygon};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::memory::InMemoryTerritoryProvider;
use super::types::{DataSourceError, TerritoryDataProvider, TerritoryRecord, TerritorySet};
use crate::coord::{lat_to_meters_y, lon_to_meters_x};
use crate::geometry;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Value>,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    region: Option<Value>,
    #[serde(default)]
    label: Option<Vec<f64>>,
}

type Rings = Vec<Vec<Vec<f64>>>;

/// Territories loaded from a GeoJSON document.
#[derive(Debug, Clone)]
pub struct GeoJsonTerritoryProvider {
    inner: InMemoryTerritoryProvider,
}

impl GeoJsonTerritoryProvider {
    /// Loads and parses a GeoJSON file.
    pub fn from_path(path: &Path) -> Result<Self, DataSourceError> {
        let text = std::fs::read_to_string(path).map_err(|source| DataSourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let provider = Self::parse(&text)?;
        debug!(path = %path.display(), territories = provider.len(), "Loaded GeoJSON territories");
        Ok(provider)
    }

    /// Parses a GeoJSON document.
    pub fn parse(text: &str) -> Result<Self, DataSourceError> {
        let collection: FeatureCollection = serde_json::from_str(text)?;
        if collection.kind != "FeatureCollection" {
            return Err(DataSourceError::InvalidFeature {
                index: 0,
                reason: format!("expected FeatureCollection, found {}", collection.kind),
            });
        }

        let mut inner = InMemoryTerritoryProvider::new();
        for (index, feature) in collection.features.into_iter().enumerate() {
            let Some(geometry) = feature.geometry.filter(|g| !g.is_null()) else {
                warn!(index, "Skipping feature without geometry");
                continue;
            };
            let properties = feature.properties.unwrap_or_default();

            let invalid = |reason: String| DataSourceError::InvalidFeature { index, reason };
            let boundary = parse_geometry(&geometry).map_err(invalid)?;
            let label = match properties.label.as_deref() {
                Some([lon, lat, ..]) => project(*lon, *lat),
                Some(_) => return Err(invalid("label must be [lon, lat]".to_string())),
                None => default_label(&boundary).ok_or_else(|| invalid("empty geometry".to_string()))?,
            };

            let record = TerritoryRecord {
                name: properties.name.unwrap_or_default(),
                boundary_wkb: geometry::write_multi_polygon(&boundary),
                label_wkb: geometry::write_point(&Point::from(label)),
                owner_color: properties.color,
            };
            let region = properties.region.as_ref().and_then(region_id);
            inner.add(region.as_deref(), record);
        }

        Ok(Self { inner })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl TerritoryDataProvider for GeoJsonTerritoryProvider {
    fn fetch(&self, region: Option<&str>) -> Result<TerritorySet, DataSourceError> {
        self.inner.fetch(region)
    }

    fn name(&self) -> &str {
        "geojson"
    }
}

/// Region ids may be written as strings or numbers.
fn region_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn project(lon: f64, lat: f64) -> Coord<f64> {
    Coord {
        x: lon_to_meters_x(lon),
        y: lat_to_meters_y(lat),
    }
}

fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>, String> {
    let kind = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or("geometry has no type")?;
    let coordinates = geometry
        .get("coordinates")
        .cloned()
        .ok_or("geometry has no coordinates")?;

    let polygons: Vec<Rings> = match kind {
        "Polygon" => vec![serde_json::from_value(coordinates).map_err(|e| e.to_string())?],
        "MultiPolygon" => serde_json::from_value(coordinates).map_err(|e| e.to_string())?,
        other => return Err(format!("unsupported geometry type {}", other)),
    };

    let polygons = polygons
        .into_iter()
        .map(parse_polygon)
        .collect::<Result<Vec<_>, _>>()?;
    if polygons.is_empty() {
        return Err("empty geometry".to_string());
    }
    Ok(MultiPolygon::new(polygons))
}

fn parse_polygon(rings: Rings) -> Result<Polygon<f64>, String> {
    let mut rings = rings.into_iter().map(parse_ring);
    let exterior = rings.next().ok_or("polygon without rings")??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(positions: Vec<Vec<f64>>) -> Result<LineString<f64>, String> {
    positions
        .iter()
        .map(|p| match p.as_slice() {
            [lon, lat, ..] => Ok(project(*lon, *lat)),
            _ => Err("position needs at least two ordinates".to_string()),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

/// Area-weighted centroid of the largest exterior ring, or the centre of
/// its bounding box when the ring has no area.
fn default_label(boundary: &MultiPolygon<f64>) -> Option<Coord<f64>> {
    let largest = boundary
        .0
        .iter()
        .map(|p| p.exterior())
        .max_by(|a, b| signed_area(a).abs().total_cmp(&signed_area(b).abs()))?;

    ring_centroid(largest).or_else(|| bbox_centre(largest))
}

fn signed_area(ring: &LineString<f64>) -> f64 {
    ring.lines()
        .map(|l| l.start.x * l.end.y - l.end.x * l.start.y)
        .sum::<f64>()
        / 2.0
}

fn ring_centroid(ring: &LineString<f64>) -> Option<Coord<f64>> {
    let area = signed_area(ring);
    if area.abs() < f64::EPSILON {
        return None;
    }

    // Shift to the first vertex to keep the products small
    let origin = *ring.0.first()?;
    let (mut cx, mut cy) = (0.0, 0.0);
    for line in ring.lines() {
        let (x0, y0) = (line.start.x - origin.x, line.start.y - origin.y);
        let (x1, y1) = (line.end.x - origin.x, line.end.y - origin.y);
        let cross = x0 * y1 - x1 * y0;
        cx += (x0 + x1) * cross;
        cy += (y0 + y1) * cross;
    }

    Some(Coord {
        x: origin.x + cx / (6.0 * area),
        y: origin.y + cy / (6.0 * area),
    })
}

fn bbox_centre(ring: &LineString<f64>) -> Option<Coord<f64>> {
    let first = ring.0.first()?;
    let (mut min, mut max) = (*first, *first);
    for c in &ring.0 {
        min.x = min.x.min(c.x);
        min.y = min.y.min(c.y);
        max.x = max.x.max(c.x);
        max.y = max.y.max(c.y);
    }
    Some(Coord {
        x: (min.x + max.x) / 2.0,
        y: (min.y + max.y) / 2.0,
    })
}

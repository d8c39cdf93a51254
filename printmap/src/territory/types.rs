//! Territory records and the data provider trait

use std::path::PathBuf;

use geo_types::{MultiPolygon, Point};
use thiserror::Error;

use crate::coord::GeoEnvelope;
use crate::geometry::{self, GeometryError};

/// One territory as delivered by a data provider.
///
/// Geometries are WKB in EPSG:3857 meters.
#[derive(Debug, Clone, PartialEq)]
pub struct TerritoryRecord {
    pub name: String,
    /// Polygon or MultiPolygon
    pub boundary_wkb: Vec<u8>,
    /// Point
    pub label_wkb: Vec<u8>,
    /// `#RRGGBB` of the owning city, if any
    pub owner_color: Option<String>,
}

/// Territories matching a query plus their enclosing bounding box.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerritorySet {
    pub records: Vec<TerritoryRecord>,
    /// EPSG:3857 envelope of all boundaries; `None` when empty.
    pub bbox: Option<GeoEnvelope>,
}

impl TerritorySet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decoded territory, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRecord {
    pub name: String,
    pub boundary: MultiPolygon<f64>,
    pub label: Point<f64>,
    pub owner_color: Option<String>,
}

impl BoundaryRecord {
    /// Decodes both WKB payloads of a record.
    pub fn decode(record: &TerritoryRecord) -> Result<Self, GeometryError> {
        Ok(Self {
            name: record.name.clone(),
            boundary: geometry::read_boundary(&record.boundary_wkb)?,
            label: geometry::read_point(&record.label_wkb)?,
            owner_color: record.owner_color.clone(),
        })
    }
}

/// Errors raised by territory data providers.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// Source file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source is not valid JSON or not the expected document shape.
    #[error("Invalid territory document: {0}")]
    Json(#[from] serde_json::Error),

    /// A feature could not be turned into a territory.
    #[error("Invalid feature #{index}: {reason}")]
    InvalidFeature { index: usize, reason: String },

    /// Backend-specific failure.
    #[error("Territory source unavailable: {0}")]
    Unavailable(String),
}

/// Source of territory geometries.
///
/// Implementors return every territory, or only those of one region when a
/// filter is given. Region identifiers are opaque strings.
pub trait TerritoryDataProvider: Send + Sync {
    /// Fetches territories.
    ///
    /// # Arguments
    ///
    /// * `region` - Optional region filter
    ///
    /// # Returns
    ///
    /// The matching records (possibly none) and their bounding box.
    fn fetch(&self, region: Option<&str>) -> Result<TerritorySet, DataSourceError>;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}

/// EPSG:3857 envelope of every coordinate of a multipolygon.
pub fn boundary_envelope(boundary: &MultiPolygon<f64>) -> Option<GeoEnvelope> {
    let mut coords = boundary
        .0
        .iter()
        .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
        .flat_map(|ring| ring.0.iter());

    let first = coords.next()?;
    let init = GeoEnvelope::web_mercator(first.x, first.y, first.x, first.y);
    Some(coords.fold(init, |env, c| {
        env.union(&GeoEnvelope::web_mercator(c.x, c.y, c.x, c.y))
    }))
}

//! Territory data sources.
//!
//! A [`TerritoryDataProvider`] returns the territories of an optional region
//! together with their combined bounding box in EPSG:3857. Boundaries and
//! label anchors travel as WKB so any backing store can feed the exporter.

mod geojson;
mod memory;
mod types;

pub use geojson::GeoJsonTerritoryProvider;
pub use memory::InMemoryTerritoryProvider;
pub use types::{
    boundary_envelope, BoundaryRecord, DataSourceError, TerritoryDataProvider, TerritoryRecord,
    TerritorySet,
};

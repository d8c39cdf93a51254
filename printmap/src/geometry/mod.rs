//! Territory geometry decoding.
//!
//! Boundaries and label anchors travel as WKB in EPSG:3857 meters and are
//! decoded into `geo_types` values for rendering.

mod error;
mod wkb;

pub use error::GeometryError;
pub use wkb::{read_boundary, read_point, write_multi_polygon, write_point};

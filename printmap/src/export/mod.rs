//! Map export
//!
//! [`MapExporter`] ties everything together: territories are loaded and
//! decoded, the covering base map is fetched and cropped to their extent,
//! letterboxed onto the page, and the boundaries and labels are drawn on
//! top before the page is encoded as PNG.

mod error;
mod request;
mod service;

pub use error::ExportError;
pub use request::{ExportRequest, DEFAULT_DPI, DEFAULT_ZOOM};
pub use service::{MapExporter, DEFAULT_MARGIN};

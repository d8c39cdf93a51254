//! printmap - print-ready territory maps over a WMTS base map
//!
//! The library turns a set of territory boundaries into a single PNG page:
//! the covering Web Mercator tiles are downloaded and stitched, cropped to
//! the territories' extent, letterboxed onto an A3/A4 canvas at the
//! requested resolution, and overlaid with coloured boundaries and names.
//!
//! ```ignore
//! use std::sync::Arc;
//! use printmap::export::{ExportRequest, MapExporter};
//! use printmap::mosaic::MosaicFetcher;
//! use printmap::provider::{ReqwestClient, WmtsLayer, WmtsProvider};
//! use printmap::render::{LabelFont, OverlayRenderer};
//! use printmap::territory::GeoJsonTerritoryProvider;
//!
//! let source = WmtsProvider::new(ReqwestClient::new()?, WmtsLayer::default())?;
//! let fetcher = MosaicFetcher::new(Arc::new(source), 8)?;
//! let territories = GeoJsonTerritoryProvider::from_path("territories.geojson".as_ref())?;
//! let overlay = OverlayRenderer::new(LabelFont::embedded(18.0)?);
//!
//! let exporter = MapExporter::new(Arc::new(territories), fetcher, overlay);
//! let png = exporter.export_png(&ExportRequest::default())?;
//! ```

pub mod config;
pub mod coord;
pub mod export;
pub mod geometry;
pub mod logging;
pub mod mosaic;
pub mod page;
pub mod provider;
pub mod render;
pub mod territory;

/// Crate version, sent as part of the HTTP user agent.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

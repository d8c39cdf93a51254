//! Tiles command - show which base map tiles an area needs.

use std::path::PathBuf;

use clap::Args;
use printmap::coord::{clamp_zoom, GeoEnvelope, TileRange};

use super::common::{load_config, wmts_provider};
use crate::error::CliError;

/// Arguments for the tiles command.
#[derive(Debug, Args)]
pub struct TilesArgs {
    /// Area as minLon,minLat,maxLon,maxLat (WGS84 degrees)
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: GeoEnvelope,

    /// Zoom level (clamped to 0-19)
    #[arg(long, allow_hyphen_values = true)]
    pub zoom: i32,

    /// Config file (default: ~/.printmap/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Parses `minLon,minLat,maxLon,maxLat`.
pub fn parse_bbox(value: &str) -> Result<GeoEnvelope, String> {
    let parts = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in bbox: {}", e))?;

    match parts.as_slice() {
        [min_lon, min_lat, max_lon, max_lat] => {
            if parts.iter().any(|v| !v.is_finite()) {
                return Err("bbox values must be finite".to_string());
            }
            Ok(GeoEnvelope::wgs84(*min_lon, *min_lat, *max_lon, *max_lat))
        }
        _ => Err(format!(
            "expected 4 comma-separated values, got {}",
            parts.len()
        )),
    }
}

/// Run the tiles command.
pub fn run(args: TilesArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let range = TileRange::covering(&args.bbox, clamp_zoom(args.zoom));

    println!("Area:      {}", args.bbox);
    println!("Zoom:      {}", range.zoom);
    println!(
        "Columns:   {}..={} ({})",
        range.col_min,
        range.col_max,
        range.cols()
    );
    println!(
        "Rows:      {}..={} ({})",
        range.row_min,
        range.row_max,
        range.rows()
    );
    println!("Tiles:     {}", range.tile_count());
    println!(
        "Mosaic:    {}x{} px",
        range.pixel_width(),
        range.pixel_height()
    );
    println!("Envelope:  {}", range.envelope());

    if let Some(first) = range.tiles().next() {
        let provider = wmts_provider(&config)?;
        println!("First URL: {}", provider.build_url(&first));
    }

    Ok(())
}

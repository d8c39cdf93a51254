//! Export command - render territories onto a printable PNG page.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use printmap::export::{ExportRequest, MapExporter};
use printmap::render::OverlayRenderer;
use printmap::territory::GeoJsonTerritoryProvider;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::common::{label_font, load_config, mosaic_fetcher, start_logging};
use crate::error::CliError;

/// Arguments for the export command.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// GeoJSON FeatureCollection of territory polygons (WGS84)
    #[arg(long)]
    pub territories: PathBuf,

    /// Output PNG file
    #[arg(long, short)]
    pub output: PathBuf,

    /// Paper size: A3 or A4 (unknown values mean A4)
    #[arg(long)]
    pub paper: Option<String>,

    /// Orientation: portrait or landscape (unknown values mean landscape)
    #[arg(long)]
    pub orientation: Option<String>,

    /// Output resolution in dots per inch
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Only export territories of this region
    #[arg(long)]
    pub region: Option<String>,

    /// Base map zoom level (clamped to 0-19)
    #[arg(long, allow_hyphen_values = true)]
    pub zoom: Option<i32>,

    /// Do not draw territory names
    #[arg(long)]
    pub no_labels: bool,

    /// Config file (default: ~/.printmap/config.ini)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ExportArgs {
    /// Merges the arguments with the configured defaults.
    fn to_request(&self, config: &printmap::config::ConfigFile) -> ExportRequest {
        let paper = self
            .paper
            .clone()
            .unwrap_or_else(|| config.export.paper.to_string());
        let orientation = self
            .orientation
            .clone()
            .unwrap_or_else(|| config.export.orientation.to_string());

        ExportRequest::from_params(
            &paper,
            &orientation,
            self.dpi.unwrap_or(config.export.dpi),
            self.region.as_deref(),
            self.zoom.unwrap_or(config.export.zoom),
            config.export.labels && !self.no_labels,
        )
    }
}

/// Run the export command.
pub fn run(args: ExportArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?;
    let _guard = start_logging(&config)?;
    info!(version = printmap::VERSION, "printmap export");

    let request = args.to_request(&config);
    if request.dpi == 0 {
        return Err(CliError::InvalidArgument("--dpi must be at least 1".to_string()));
    }

    let territories = GeoJsonTerritoryProvider::from_path(&args.territories)?;
    println!(
        "Loaded {} territories from {}",
        territories.len(),
        args.territories.display()
    );

    let overlay = OverlayRenderer::new(label_font(&config)?);
    let exporter = MapExporter::new(Arc::new(territories), mosaic_fetcher(&config)?, overlay)
        .with_margin(config.export.margin);

    let (width, height) = request.canvas_size();
    println!(
        "Rendering {} {} at {} dpi ({}x{} px), zoom {}",
        request.paper, request.orientation, request.dpi, width, height, request.zoom
    );

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nCancelling export...");
        handler_token.cancel();
    }) {
        warn!(error = %e, "Ctrl-C handler not installed");
    }

    let start = Instant::now();
    let png = exporter.export_png_with_cancel(&request, &cancel)?;

    std::fs::write(&args.output, &png).map_err(|error| CliError::FileWrite {
        path: args.output.display().to_string(),
        error,
    })?;

    println!(
        "Wrote {} ({} bytes) in {:.2}s",
        args.output.display(),
        png.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

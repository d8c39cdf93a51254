//! Setup shared by the CLI commands.

use std::path::Path;
use std::sync::Arc;

use printmap::config::ConfigFile;
use printmap::logging::{init_logging, LoggingGuard};
use printmap::mosaic::MosaicFetcher;
use printmap::provider::{ReqwestClient, WmtsProvider};
use printmap::render::LabelFont;

use crate::error::CliError;

/// Loads the configuration from `path`, or from `~/.printmap/config.ini`.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    Ok(config)
}

/// Starts logging to the configured directory.
pub fn start_logging(config: &ConfigFile) -> Result<LoggingGuard, CliError> {
    init_logging(&config.logging.directory, &config.logging.file)
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}

/// WMTS tile source configured from `[wmts]` and `[download]`.
pub fn wmts_provider(config: &ConfigFile) -> Result<WmtsProvider<ReqwestClient>, CliError> {
    let client = ReqwestClient::with_timeouts(
        config.download.timeout_secs,
        config.download.connect_timeout_secs,
    )?;
    Ok(WmtsProvider::new(client, config.wmts.to_layer())?)
}

/// Tile fetcher over the configured WMTS source.
pub fn mosaic_fetcher(config: &ConfigFile) -> Result<MosaicFetcher, CliError> {
    let source = wmts_provider(config)?;
    MosaicFetcher::new(Arc::new(source), config.download.max_parallel).map_err(CliError::Fetcher)
}

/// Label font from `[render]`: the configured file or the embedded font.
pub fn label_font(config: &ConfigFile) -> Result<LabelFont, CliError> {
    match &config.render.font_path {
        Some(path) => LabelFont::from_file(path, config.render.font_size),
        None => LabelFont::embedded(config.render.font_size),
    }
    .map_err(CliError::Font)
}

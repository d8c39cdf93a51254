//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.

use std::path::PathBuf;

use crate::page::{Orientation, PaperSize};
use crate::provider::WmtsLayer;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Base map service
    pub wmts: WmtsSettings,
    /// Tile download behaviour
    pub download: DownloadSettings,
    /// Default export parameters
    pub export: ExportSettings,
    /// Label font
    pub render: RenderSettings,
    /// Log file location
    pub logging: LoggingSettings,
}

/// WMTS endpoint and layer.
#[derive(Debug, Clone, PartialEq)]
pub struct WmtsSettings {
    pub base_url: String,
    pub layer: String,
    pub style: String,
    pub format: String,
    pub tile_matrix_set: String,
}

impl WmtsSettings {
    /// Layer description for [`crate::provider::WmtsProvider`].
    pub fn to_layer(&self) -> WmtsLayer {
        WmtsLayer {
            base_url: self.base_url.clone(),
            layer: self.layer.clone(),
            style: self.style.clone(),
            format: self.format.clone(),
            tile_matrix_set: self.tile_matrix_set.clone(),
        }
    }
}

/// Download configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Concurrent tile downloads.
    pub max_parallel: usize,
}

/// Export defaults, used when the command line does not override them.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub dpi: u32,
    pub zoom: i32,
    pub labels: bool,
    /// Margin around the territories as a fraction of their extent.
    pub margin: f64,
}

/// Label rendering configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Font file; the embedded DejaVu Sans when `None`.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

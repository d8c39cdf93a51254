//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::settings::*;
use crate::export::{DEFAULT_DPI, DEFAULT_MARGIN, DEFAULT_ZOOM};
use crate::mosaic::DEFAULT_MAX_PARALLEL;
use crate::page::{Orientation, PaperSize};
use crate::provider::{
    DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_FORMAT, DEFAULT_LAYER, DEFAULT_STYLE,
    DEFAULT_TILE_MATRIX_SET, DEFAULT_TIMEOUT_SECS,
};
use crate::render::DEFAULT_FONT_SIZE;

/// Minimum concurrent tile downloads.
pub const MIN_MAX_PARALLEL: usize = 1;

/// Maximum concurrent tile downloads.
/// Public WMTS endpoints throttle clients well before this.
pub const MAX_MAX_PARALLEL: usize = 64;

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "printmap.log";

/// Clamps download concurrency to the valid range and logs a warning if clamped.
pub(super) fn clamp_max_parallel(value: usize) -> usize {
    let clamped = value.clamp(MIN_MAX_PARALLEL, MAX_MAX_PARALLEL);
    if clamped != value {
        tracing::warn!(
            requested = value,
            min = MIN_MAX_PARALLEL,
            max = MAX_MAX_PARALLEL,
            "max_parallel out of range, clamping to {}",
            clamped
        );
    }
    clamped
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            wmts: WmtsSettings {
                base_url: DEFAULT_BASE_URL.to_string(),
                layer: DEFAULT_LAYER.to_string(),
                style: DEFAULT_STYLE.to_string(),
                format: DEFAULT_FORMAT.to_string(),
                tile_matrix_set: DEFAULT_TILE_MATRIX_SET.to_string(),
            },
            download: DownloadSettings {
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
                max_parallel: DEFAULT_MAX_PARALLEL,
            },
            export: ExportSettings {
                paper: PaperSize::A4,
                orientation: Orientation::Landscape,
                dpi: DEFAULT_DPI,
                zoom: DEFAULT_ZOOM,
                labels: true,
                margin: DEFAULT_MARGIN,
            },
            render: RenderSettings {
                font_path: None,
                font_size: DEFAULT_FONT_SIZE,
            },
            logging: LoggingSettings {
                directory: PathBuf::from(DEFAULT_LOG_DIR),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}

//! Configuration file (`~/.printmap/config.ini`).
//!
//! ```ignore
//! use printmap::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let layer = config.wmts.to_layer();
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE, MAX_MAX_PARALLEL, MIN_MAX_PARALLEL};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, DownloadSettings, ExportSettings, LoggingSettings, RenderSettings, WmtsSettings,
};

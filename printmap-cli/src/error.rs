//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a non-zero exit code.

use std::fmt;
use std::process;

use printmap::config::ConfigFileError;
use printmap::export::ExportError;
use printmap::mosaic::MosaicError;
use printmap::provider::ProviderError;
use printmap::render::RenderError;
use printmap::territory::DataSourceError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded
    Config(ConfigFileError),
    /// Invalid command line argument
    InvalidArgument(String),
    /// Tile source could not be created
    Provider(ProviderError),
    /// Download pool could not be created
    Fetcher(MosaicError),
    /// Label font could not be loaded
    Font(RenderError),
    /// Territory file could not be loaded
    Territories(DataSourceError),
    /// Export failed
    Export(ExportError),
    /// Failed to write output file
    FileWrite { path: String, error: std::io::Error },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Export(ExportError::Mosaic(MosaicError::EndpointUnreachable { .. })) => {
                eprintln!();
                eprintln!("The WMTS endpoint could not be reached. Check:");
                eprintln!("  1. Your network connection");
                eprintln!("  2. base_url in the [wmts] section of config.ini");
            }
            CliError::Export(ExportError::Mosaic(MosaicError::TooLarge { .. })) => {
                eprintln!();
                eprintln!("Lower --zoom or export a single --region.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Provider(e) => write!(f, "Failed to create tile source: {}", e),
            CliError::Fetcher(e) => write!(f, "Failed to create tile fetcher: {}", e),
            CliError::Font(e) => write!(f, "Failed to load label font: {}", e),
            CliError::Territories(e) => write!(f, "Failed to load territories: {}", e),
            CliError::Export(e) => write!(f, "Export failed: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Fetcher(e) => Some(e),
            CliError::Font(e) => Some(e),
            CliError::Territories(e) => Some(e),
            CliError::Export(e) => Some(e),
            CliError::FileWrite { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<DataSourceError> for CliError {
    fn from(e: DataSourceError) -> Self {
        CliError::Territories(e)
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::Export(e)
    }
}

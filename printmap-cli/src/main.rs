//! printmap CLI - Command-line interface
//!
//! Exports print-ready territory maps with the printmap library.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::export::ExportArgs;
use commands::tiles::TilesArgs;

#[derive(Parser)]
#[command(name = "printmap")]
#[command(version, about = "Print-ready territory maps over a WMTS base map", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export territories as a PNG page
    Export(ExportArgs),
    /// Show the tiles covering an area
    Tiles(TilesArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export(args) => commands::export::run(args),
        Commands::Tiles(args) => commands::tiles::run(args),
    };

    if let Err(e) = result {
        e.exit();
    }
}

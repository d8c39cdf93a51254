//! CLI command implementations.
//!
//! - [`export`] - Render territories to a PNG page
//! - [`tiles`] - Inspect the tile grid covering an area

pub mod common;
pub mod export;
pub mod tiles;

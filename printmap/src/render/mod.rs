//! Page rendering
//!
//! Placement of the cropped base map on the page ([`Placement`]), the
//! world-to-pixel transform derived from it ([`AffineMapping`]), and the
//! territory overlay ([`OverlayRenderer`]) drawn on a tiny-skia [`Canvas`].

mod affine;
mod canvas;
mod color;
mod error;
mod label;
mod letterbox;
mod overlay;

pub use affine::AffineMapping;
pub use canvas::Canvas;
pub use color::{fill_color, parse_owner_color, FALLBACK_FILL, FILL_ALPHA};
pub use error::RenderError;
pub use label::{LabelFont, DEFAULT_FONT_SIZE};
pub use letterbox::Placement;
pub use overlay::{OverlayRenderer, OverlayStyle};

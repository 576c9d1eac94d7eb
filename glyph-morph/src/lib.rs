//! Pixel-grid morphing between two rendered texts.

pub mod curve;
pub mod direction;
pub mod display;
pub mod error;
pub mod font;
pub mod grid;
pub mod morph;
pub mod params;
pub mod phase;
pub mod registry;
pub mod scroll;
pub mod styles;

pub use curve::{Curve, ShapedCurve};
pub use direction::Direction;
pub use error::{MorphError, MorphResult};
pub use grid::{Grid, Size};
pub use morph::{MorphOptions, morph};
pub use params::MorphParams;
pub use registry::Registry;

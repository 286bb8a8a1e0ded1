//! Image geometry planning and derivative encoding.

pub mod encoder;
pub mod geometry;

pub use encoder::DerivativeEncoder;
pub use geometry::{Dimensions, GeometryPlanner, ResizePlan};

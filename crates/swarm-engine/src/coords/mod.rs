//! Coordinate and color types shared across the engine.
//!
//! Two spaces exist:
//! - pixels: origin top-left, +X right, +Y down (window setup, physics)
//! - normalized: origin center, +Y up, X in `[-aspect, aspect]`, Y in `[-1, 1]`
//!   (instances, shaders)
//!
//! `mapper` converts one-way from pixels to normalized units and builds the
//! orthographic projection that frames the normalized space.

mod color;
mod mapper;
mod vec2;
mod viewport;

pub use color::{ColorRgba, Rgb};
pub use mapper::{orthographic, pixel_len_to_normalized, pixel_to_normalized, CoordMapper};
pub use vec2::Vec2;
pub use viewport::Viewport;

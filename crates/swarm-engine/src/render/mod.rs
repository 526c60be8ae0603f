//! GPU rendering subsystem.
//!
//! One instanced program draws every circle and rect in the store over a
//! shared unit quad. Instance attributes live in device buffers mirrored on
//! the CPU and are re-uploaded only when a simulation marks them dirty.
//!
//! Convention:
//! - Instance geometry is in normalized view units (center origin, +Y up,
//!   X scaled by the aspect ratio).
//! - The vertex shader applies a fixed orthographic projection uniform.

mod buffers;
mod ctx;
mod geometry;
mod mirror;
mod mode;
mod renderer;
mod shader;

pub use buffers::InstanceBuffers;
pub use ctx::{RenderCtx, RenderTarget, SurfaceInfo};
pub use geometry::QUAD_CORNERS;
pub use mirror::{attr_bytes, AttrView, BufferSpec, DirtyAttrs, InstanceAttr, MirrorLayout, StagingMirror};
pub use mode::RenderMode;
pub use renderer::ShapeRenderer;
pub use shader::{compile_program, parse_module, SHAPES_WGSL};

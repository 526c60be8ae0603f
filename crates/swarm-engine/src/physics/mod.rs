//! Physics World Adapter.
//!
//! Wraps a rapier2d simulation behind pixel-space operations. One scale
//! factor (`PhysicsConfig::pixels_per_unit`) converts everything crossing the
//! boundary.

mod config;
mod world;

pub use config::{BodyMaterial, PhysicsConfig};
pub use world::{BodyHandle, PhysicsWorld, StepOutcome};

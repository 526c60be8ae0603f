//! Swarm engine crate.
//!
//! Instanced 2D shape rendering driven by a simulate-then-draw frame loop,
//! with an optional rigid-body world behind it. Owns the platform + GPU
//! runtime pieces used by the demo programs.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod instances;
pub mod physics;
pub mod sim;
pub mod render;
pub mod frame;

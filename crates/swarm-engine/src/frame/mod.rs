//! The frame loop: simulate, upload, draw, present.
//!
//! Sequencing inside one iteration is enforced by move-only tokens: uploading
//! needs the `Simulated` produced by this frame's simulation, drawing needs the
//! `Uploaded` produced by that upload.

mod frame_loop;
mod sequence;

pub use frame_loop::{FrameLoop, FrameLoopConfig, LoopState};
pub use sequence::{Simulated, Uploaded};

//! Shape Instance Store.
//!
//! `Instance` is the CPU-side record of one shape; `InstanceRaw` is the packed
//! form the GPU reads. The store owns the canonical per-frame state.

mod instance;
mod store;

pub use instance::{Instance, InstanceRaw, Shape};
pub use store::InstanceStore;

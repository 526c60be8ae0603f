//! Simulations that drive the instance store.
//!
//! A `Simulation` owns whatever moves the shapes (a random generator, a
//! physics world) and writes the result into the store each frame. The frame
//! loop calls `populate` once, then `step` and `sync` in that order every
//! iteration.

mod bodies;
mod fountain;
mod rigid;
mod scatter;

pub use fountain::{Fountain, FountainOptions};
pub use rigid::{Rigid, RigidOptions};
pub use scatter::{Scatter, ScatterOptions};

use crate::coords::CoordMapper;
use crate::instances::InstanceStore;
use crate::physics::StepOutcome;
use crate::render::DirtyAttrs;

pub trait Simulation {
    /// Per-slot payload stored next to each instance.
    type Link;

    /// Fills the store at startup. Slots already present are kept.
    fn populate(&mut self, store: &mut InstanceStore<Self::Link>, mapper: &CoordMapper);

    /// Advances internal state by `dt` seconds. May append instances.
    fn step(
        &mut self,
        dt: f32,
        store: &mut InstanceStore<Self::Link>,
        mapper: &CoordMapper,
    ) -> StepOutcome;

    /// Writes current state into the store and reports what changed.
    fn sync(&mut self, store: &mut InstanceStore<Self::Link>, mapper: &CoordMapper) -> DirtyAttrs;
}

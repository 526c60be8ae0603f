use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coords::{CoordMapper, Vec2};
use crate::instances::{Instance, InstanceStore};
use crate::physics::StepOutcome;
use crate::render::DirtyAttrs;

use super::bodies::{random_color, random_shape};
use super::Simulation;

#[derive(Debug, Clone)]
pub struct ScatterOptions {
    /// Circle radius / square half-extent, normalized units.
    pub size: f32,
    /// Probability that a populated instance is a square.
    pub rect_chance: f64,
    /// Shared rotation speed, radians per second.
    pub rotation_speed: f32,
    /// Also re-randomize colors every frame.
    pub recolor: bool,
    pub seed: Option<u64>,
}

impl Default for ScatterOptions {
    fn default() -> Self {
        Self {
            size: 0.025,
            rect_chance: 0.5,
            rotation_speed: 1.0,
            recolor: false,
            seed: None,
        }
    }
}

/// No-physics simulation: every frame each instance jumps to a random spot in
/// the visible area, and all of them share one spinning angle.
pub struct Scatter {
    options: ScatterOptions,
    rng: StdRng,
    rotation: f32,
}

impl Scatter {
    pub fn new(options: ScatterOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            options,
            rng,
            rotation: 0.0,
        }
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    fn random_position(&mut self, mapper: &CoordMapper) -> Vec2 {
        let (min, max) = mapper.bounds();
        Vec2::new(
            self.rng.random_range(min.x..=max.x),
            self.rng.random_range(min.y..=max.y),
        )
    }
}

impl Simulation for Scatter {
    type Link = ();

    fn populate(&mut self, store: &mut InstanceStore, mapper: &CoordMapper) {
        let size = self.options.size;
        while !store.is_full() {
            let position = self.random_position(mapper);
            let shape = random_shape(&mut self.rng, (size, size), self.options.rect_chance);
            let color = random_color(&mut self.rng);
            store.push(Instance::new(position, shape, color), ());
        }
        log::debug!("scatter populated {} instances", store.count());
    }

    fn step(&mut self, dt: f32, _store: &mut InstanceStore, _mapper: &CoordMapper) -> StepOutcome {
        let turned = (self.rotation + self.options.rotation_speed * dt).rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU.
        self.rotation = if turned < TAU { turned } else { 0.0 };
        StepOutcome::Advanced
    }

    fn sync(&mut self, store: &mut InstanceStore, mapper: &CoordMapper) -> DirtyAttrs {
        let recolor = self.options.recolor;
        for i in 0..store.count() {
            let mut inst = store.get(i);
            inst.position = self.random_position(mapper);
            inst.angle = self.rotation;
            if recolor {
                inst.color = random_color(&mut self.rng);
            }
            store.set(i, inst);
        }

        DirtyAttrs {
            position: true,
            angle: true,
            color: recolor,
            scale: false,
        }
    }
}

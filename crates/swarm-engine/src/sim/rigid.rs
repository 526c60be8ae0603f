use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coords::{CoordMapper, Vec2};
use crate::instances::InstanceStore;
use crate::physics::{BodyHandle, BodyMaterial, PhysicsConfig, PhysicsWorld, StepOutcome};
use crate::render::DirtyAttrs;

use super::bodies::{attach, random_color, random_shape, sync_poses};
use super::Simulation;

#[derive(Debug, Clone)]
pub struct RigidOptions {
    pub physics: PhysicsConfig,
    pub material: BodyMaterial,
    /// Radius range for circles (half side for squares), pixels.
    pub size_px: (f32, f32),
    pub rect_chance: f64,
    /// Walls sit just outside the window edges.
    pub wall_thickness_px: f32,
    pub seed: Option<u64>,
}

impl Default for RigidOptions {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            material: BodyMaterial::default(),
            size_px: (6.0, 14.0),
            rect_chance: 0.5,
            wall_thickness_px: 50.0,
            seed: None,
        }
    }
}

/// Fixed population of dynamic bodies boxed in by the window edges.
pub struct Rigid {
    options: RigidOptions,
    world: PhysicsWorld,
    rng: StdRng,
}

impl Rigid {
    pub fn new(options: RigidOptions) -> Self {
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            world: PhysicsWorld::new(options.physics),
            options,
            rng,
        }
    }

    #[inline]
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }
}

impl Simulation for Rigid {
    type Link = BodyHandle;

    fn populate(&mut self, store: &mut InstanceStore<BodyHandle>, mapper: &CoordMapper) {
        let viewport = mapper.viewport();
        self.world
            .create_boundary_walls(viewport, self.options.wall_thickness_px);

        let margin = self.options.size_px.1.max(1.0);
        while !store.is_full() {
            let center = Vec2::new(
                self.rng.random_range(margin..=(viewport.width - margin).max(margin)),
                self.rng.random_range(margin..=(viewport.height - margin).max(margin)),
            );
            let shape = random_shape(&mut self.rng, self.options.size_px, self.options.rect_chance);
            let color = random_color(&mut self.rng);
            attach(&mut self.world, store, mapper, center, shape, self.options.material, color);
        }

        log::info!(
            "rigid world: {} bodies ({} dynamic)",
            self.world.body_count(),
            store.count()
        );
    }

    fn step(
        &mut self,
        dt: f32,
        _store: &mut InstanceStore<BodyHandle>,
        _mapper: &CoordMapper,
    ) -> StepOutcome {
        self.world.step(dt)
    }

    fn sync(&mut self, store: &mut InstanceStore<BodyHandle>, mapper: &CoordMapper) -> DirtyAttrs {
        sync_poses(&self.world, store, mapper);
        DirtyAttrs::POSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;

    fn setup(capacity: usize) -> (Rigid, InstanceStore<BodyHandle>, CoordMapper) {
        let mapper = CoordMapper::new(Viewport::new(640.0, 480.0));
        let mut store = InstanceStore::with_capacity(capacity);
        let mut sim = Rigid::new(RigidOptions {
            seed: Some(3),
            ..Default::default()
        });
        sim.populate(&mut store, &mapper);
        (sim, store, mapper)
    }

    #[test]
    fn populate_creates_one_body_per_instance_plus_walls() {
        let (sim, store, _) = setup(20);
        assert_eq!(store.count(), 20);
        assert_eq!(sim.world().body_count(), 24);
    }

    #[test]
    fn instances_start_where_their_bodies_are() {
        let (sim, store, mapper) = setup(8);
        for i in 0..store.count() {
            let (pos_px, _) = sim.world().get_transform(*store.link(i));
            let expected = mapper.to_normalized(pos_px);
            let got = store.get(i).position;
            assert!((got.x - expected.x).abs() < 1e-5 && (got.y - expected.y).abs() < 1e-5);
        }
    }

    #[test]
    fn skipped_step_leaves_instances_unchanged() {
        let (mut sim, mut store, mapper) = setup(8);
        sim.sync(&mut store, &mapper);
        let before: Vec<_> = store.iter().copied().collect();

        assert_eq!(sim.step(0.1, &mut store, &mapper), StepOutcome::Skipped);
        sim.sync(&mut store, &mapper);
        let after: Vec<_> = store.iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn advanced_step_moves_instances_down_the_screen() {
        let (mut sim, mut store, mapper) = setup(8);
        let before: Vec<_> = store.iter().map(|i| i.position.y).collect();

        for _ in 0..4 {
            assert_eq!(sim.step(1.0 / 120.0, &mut store, &mapper), StepOutcome::Advanced);
        }
        let dirty = sim.sync(&mut store, &mapper);
        assert_eq!(dirty, DirtyAttrs::POSE);

        // Pixel +Y down becomes normalized +Y up: falling means y decreases.
        let fell = store
            .iter()
            .zip(&before)
            .filter(|(inst, y0)| inst.position.y < **y0)
            .count();
        assert!(fell > 0);
    }
}

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::coords::{CoordMapper, Vec2};
use crate::instances::InstanceStore;
use crate::physics::{BodyHandle, BodyMaterial, PhysicsConfig, PhysicsWorld, StepOutcome};
use crate::render::DirtyAttrs;

use super::bodies::{attach, random_color, random_shape, sync_poses};
use super::Simulation;

#[derive(Debug, Clone)]
pub struct FountainOptions {
    pub physics: PhysicsConfig,
    pub material: BodyMaterial,
    /// Seconds between two spawns.
    pub interval: f64,
    /// Spawn point in pixels; `None` means top center of the window.
    pub emitter_px: Option<Vec2>,
    /// Random offset around the emitter so bodies never start coincident.
    pub jitter_px: f32,
    /// Force applied to each body on the step it is spawned, pixels.
    pub launch_force_px: Vec2,
    /// Random horizontal spread added to the launch force.
    pub spread_px: f32,
    pub size_px: (f32, f32),
    pub rect_chance: f64,
    pub wall_thickness_px: f32,
    pub seed: Option<u64>,
}

impl Default for FountainOptions {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::with_pixels_per_unit(96.0),
            material: BodyMaterial::default(),
            interval: 0.01,
            emitter_px: None,
            jitter_px: 4.0,
            launch_force_px: Vec2::new(0.0, 2_000.0),
            spread_px: 4_000.0,
            size_px: (4.0, 8.0),
            rect_chance: 0.3,
            wall_thickness_px: 50.0,
            seed: None,
        }
    }
}

/// Spawn-over-time simulation: one new body every `interval` seconds of
/// simulated time until the store is full.
///
/// After `T` seconds exactly `min(capacity, floor(T / interval))` instances
/// exist, whether or not the physics steps in between were skipped.
pub struct Fountain {
    options: FountainOptions,
    world: PhysicsWorld,
    rng: StdRng,
    elapsed: f64,
    spawned: bool,
}

impl Fountain {
    pub fn new(options: FountainOptions) -> Self {
        assert!(options.interval > 0.0, "spawn interval must be positive");
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            world: PhysicsWorld::new(options.physics),
            options,
            rng,
            elapsed: 0.0,
            spawned: false,
        }
    }

    #[inline]
    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Simulated seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Number of instances that should exist after `elapsed` seconds.
    pub fn due(&self, capacity: usize) -> usize {
        // Tolerance absorbs accumulated float error at exact multiples.
        let ticks = (self.elapsed / self.options.interval + 1e-6).floor() as usize;
        ticks.min(capacity)
    }

    fn spawn(&mut self, store: &mut InstanceStore<BodyHandle>, mapper: &CoordMapper) {
        let viewport = mapper.viewport();
        let emitter = self
            .options
            .emitter_px
            .unwrap_or(Vec2::new(viewport.width * 0.5, viewport.height * 0.1));
        let jitter = self.options.jitter_px;
        let center = if jitter > 0.0 {
            emitter
                + Vec2::new(
                    self.rng.random_range(-jitter..=jitter),
                    self.rng.random_range(-jitter..=jitter),
                )
        } else {
            emitter
        };

        let shape = random_shape(&mut self.rng, self.options.size_px, self.options.rect_chance);
        let color = random_color(&mut self.rng);
        let index = attach(&mut self.world, store, mapper, center, shape, self.options.material, color);

        let spread = self.options.spread_px;
        let kick = if spread > 0.0 {
            Vec2::new(self.rng.random_range(-spread..=spread), 0.0)
        } else {
            Vec2::zero()
        };
        self.world
            .apply_force(*store.link(index), self.options.launch_force_px + kick);
    }
}

impl Simulation for Fountain {
    type Link = BodyHandle;

    fn populate(&mut self, _store: &mut InstanceStore<BodyHandle>, mapper: &CoordMapper) {
        self.world
            .create_boundary_walls(mapper.viewport(), self.options.wall_thickness_px);
        log::info!(
            "fountain: one body every {}s, {} px/unit",
            self.options.interval,
            self.world.config().pixels_per_unit
        );
    }

    fn step(
        &mut self,
        dt: f32,
        store: &mut InstanceStore<BodyHandle>,
        mapper: &CoordMapper,
    ) -> StepOutcome {
        self.elapsed += dt as f64;

        let was_full = store.is_full();
        let due = self.due(store.capacity());
        while store.count() < due {
            self.spawn(store, mapper);
            self.spawned = true;
        }
        if store.is_full() && !was_full {
            log::debug!("fountain reached capacity ({}) at t = {:.2}s", store.capacity(), self.elapsed);
        }

        self.world.step(dt)
    }

    fn sync(&mut self, store: &mut InstanceStore<BodyHandle>, mapper: &CoordMapper) -> DirtyAttrs {
        sync_poses(&self.world, store, mapper);
        // Fresh slots carry scale and color too.
        if std::mem::take(&mut self.spawned) {
            DirtyAttrs::ALL
        } else {
            DirtyAttrs::POSE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;

    const DT: f32 = 1.0 / 128.0;

    fn mapper() -> CoordMapper {
        CoordMapper::new(Viewport::new(800.0, 600.0))
    }

    fn fountain(options: FountainOptions) -> Fountain {
        Fountain::new(FountainOptions {
            seed: Some(11),
            ..options
        })
    }

    #[test]
    fn spawn_count_follows_elapsed_time() {
        let mapper = mapper();
        let mut store = InstanceStore::with_capacity(1000);
        let mut sim = fountain(FountainOptions::default());
        sim.populate(&mut store, &mapper);

        for k in 1..=64usize {
            sim.step(DT, &mut store, &mapper);
            // elapsed = k / 128 s, interval 0.01 s
            let expected = (k * 100 / 128).min(1000);
            assert_eq!(store.count(), expected, "after {k} steps");
        }
        assert_eq!(store.count(), 50);
        assert_eq!(sim.world().body_count(), 50 + 4);
    }

    #[test]
    fn spawning_stops_at_capacity() {
        let mapper = mapper();
        let mut store = InstanceStore::with_capacity(30);
        let mut sim = fountain(FountainOptions::default());
        sim.populate(&mut store, &mapper);

        for _ in 0..128 {
            sim.step(DT, &mut store, &mapper);
        }
        assert!((sim.elapsed() - 1.0).abs() < 1e-9);
        assert_eq!(store.count(), 30);
        for i in 0..store.count() {
            let (pos, _) = sim.world().get_transform(*store.link(i));
            assert!(pos.is_finite());
        }
    }

    #[test]
    fn skipped_steps_still_spawn() {
        let mapper = mapper();
        let mut store = InstanceStore::with_capacity(100);
        let mut sim = fountain(FountainOptions::default());
        sim.populate(&mut store, &mapper);

        assert_eq!(sim.step(0.25, &mut store, &mapper), StepOutcome::Skipped);
        assert_eq!(store.count(), 25);
    }

    #[test]
    fn fresh_spawn_moves_under_its_launch_force() {
        let mapper = mapper();
        let mut store = InstanceStore::with_capacity(1);
        let mut sim = fountain(FountainOptions {
            physics: PhysicsConfig {
                gravity: Vec2::zero(),
                ..PhysicsConfig::with_pixels_per_unit(96.0)
            },
            interval: DT as f64,
            jitter_px: 0.0,
            spread_px: 0.0,
            launch_force_px: Vec2::new(20_000.0, 0.0),
            ..FountainOptions::default()
        });
        sim.populate(&mut store, &mapper);

        assert_eq!(sim.step(DT, &mut store, &mapper), StepOutcome::Advanced);
        assert_eq!(store.count(), 1);

        let (pos, _) = sim.world().get_transform(*store.link(0));
        assert!(pos.x > 400.0 + 1e-3, "body did not move: {pos:?}");
        assert!((pos.y - 60.0).abs() < 1e-3);
    }

    #[test]
    fn sync_flags_every_attribute_after_a_spawn() {
        let mapper = mapper();
        let mut store = InstanceStore::with_capacity(10);
        let mut sim = fountain(FountainOptions::default());
        sim.populate(&mut store, &mapper);

        sim.step(0.015, &mut store, &mapper);
        assert_eq!(store.count(), 1);
        assert_eq!(sim.sync(&mut store, &mapper), DirtyAttrs::ALL);

        sim.step(0.001, &mut store, &mapper);
        assert_eq!(store.count(), 1);
        assert_eq!(sim.sync(&mut store, &mapper), DirtyAttrs::POSE);
    }
}

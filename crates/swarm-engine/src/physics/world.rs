use std::num::NonZeroUsize;

use rapier2d::prelude::*;

use crate::coords::{Vec2, Viewport};

use super::{BodyMaterial, PhysicsConfig};

/// Opaque reference to a body owned by a `PhysicsWorld`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Result of a `PhysicsWorld::step` call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StepOutcome {
    Advanced,
    /// `dt` was at or above the step limit (or not positive); nothing moved.
    Skipped,
}

/// Rigid-body world in pixel-space terms, backed by rapier2d.
///
/// Every body is created once and lives until the world is dropped.
pub struct PhysicsWorld {
    config: PhysicsConfig,
    gravity: Vector<Real>,

    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    steps_taken: u64,
    steps_skipped: u64,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig) -> Self {
        assert!(
            config.pixels_per_unit > 0.0 && config.pixels_per_unit.is_finite(),
            "pixels_per_unit must be positive, got {}",
            config.pixels_per_unit
        );
        log::debug!(
            "physics world: {} px/unit, gravity ({}, {})",
            config.pixels_per_unit,
            config.gravity.x,
            config.gravity.y
        );

        Self {
            config,
            gravity: vector![config.gravity.x, config.gravity.y],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            steps_taken: 0,
            steps_skipped: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    #[inline]
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    #[inline]
    pub fn steps_skipped(&self) -> u64 {
        self.steps_skipped
    }

    /// Pixel vector → simulation units.
    #[inline]
    pub fn to_units(&self, px: Vec2) -> Vector<Real> {
        let ppu = self.config.pixels_per_unit;
        vector![px.x / ppu, px.y / ppu]
    }

    /// Simulation vector → pixels.
    #[inline]
    pub fn to_pixels(&self, v: &Vector<Real>) -> Vec2 {
        Vec2::new(v.x, v.y) * self.config.pixels_per_unit
    }

    /// Immovable rectangle centered at `center_px` with full size `size_px`.
    pub fn create_static_body(&mut self, center_px: Vec2, size_px: Vec2) -> BodyHandle {
        assert_positive_size(size_px);
        let body = RigidBodyBuilder::fixed()
            .translation(self.to_units(center_px))
            .build();
        let half = self.to_units(size_px * 0.5);
        let collider = ColliderBuilder::cuboid(half.x, half.y).build();
        self.insert(body, collider)
    }

    pub fn create_dynamic_circle(
        &mut self,
        center_px: Vec2,
        radius_px: f32,
        material: BodyMaterial,
    ) -> BodyHandle {
        assert!(
            radius_px > 0.0 && radius_px.is_finite(),
            "body radius must be positive, got {radius_px}"
        );
        let body = RigidBodyBuilder::dynamic()
            .translation(self.to_units(center_px))
            .build();
        let collider = ColliderBuilder::ball(radius_px / self.config.pixels_per_unit);
        self.insert(body, with_material(collider, material))
    }

    pub fn create_dynamic_rect(
        &mut self,
        center_px: Vec2,
        size_px: Vec2,
        material: BodyMaterial,
    ) -> BodyHandle {
        assert_positive_size(size_px);
        let body = RigidBodyBuilder::dynamic()
            .translation(self.to_units(center_px))
            .build();
        let half = self.to_units(size_px * 0.5);
        let collider = ColliderBuilder::cuboid(half.x, half.y);
        self.insert(body, with_material(collider, material))
    }

    /// Four static walls just outside the window edges.
    ///
    /// Order: top, bottom, left, right.
    pub fn create_boundary_walls(&mut self, viewport: Viewport, thickness_px: f32) -> [BodyHandle; 4] {
        let (w, h, t) = (viewport.width, viewport.height, thickness_px);
        [
            self.create_static_body(Vec2::new(w * 0.5, -t * 0.5), Vec2::new(w + 2.0 * t, t)),
            self.create_static_body(Vec2::new(w * 0.5, h + t * 0.5), Vec2::new(w + 2.0 * t, t)),
            self.create_static_body(Vec2::new(-t * 0.5, h * 0.5), Vec2::new(t, h + 2.0 * t)),
            self.create_static_body(Vec2::new(w + t * 0.5, h * 0.5), Vec2::new(t, h + 2.0 * t)),
        ]
    }

    pub fn apply_impulse(&mut self, handle: BodyHandle, impulse_px: Vec2) {
        let impulse = self.to_units(impulse_px);
        self.body_mut(handle).apply_impulse(impulse, true);
    }

    /// Force applied over the next step only.
    pub fn apply_force(&mut self, handle: BodyHandle, force_px: Vec2) {
        let force = self.to_units(force_px);
        self.body_mut(handle).add_force(force, true);
    }

    /// Advances the simulation with the configured iteration counts.
    pub fn step(&mut self, dt: f32) -> StepOutcome {
        let (velocity, position) = (self.config.velocity_iterations, self.config.position_iterations);
        self.step_with_iterations(dt, velocity, position)
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// A stalled frame (`dt >= max_step`) is dropped rather than sub-stepped.
    pub fn step_with_iterations(
        &mut self,
        dt: f32,
        velocity_iterations: usize,
        position_iterations: usize,
    ) -> StepOutcome {
        if !(dt > 0.0 && dt < self.config.max_step) {
            self.steps_skipped += 1;
            log::trace!("physics step skipped (dt = {dt:.4}s)");
            return StepOutcome::Skipped;
        }

        self.integration_parameters.dt = dt;
        if let Some(iterations) = NonZeroUsize::new(velocity_iterations) {
            self.integration_parameters.num_solver_iterations = iterations;
        }
        self.integration_parameters.num_internal_stabilization_iterations = position_iterations;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        // Forces are per-step; impulses were consumed by the solver already.
        for (_, body) in self.rigid_body_set.iter_mut() {
            body.reset_forces(false);
        }

        self.steps_taken += 1;
        StepOutcome::Advanced
    }

    /// Body pose in pixel space: center and angle (radians, +Y down).
    pub fn get_transform(&self, handle: BodyHandle) -> (Vec2, f32) {
        let body = self.body(handle);
        (self.to_pixels(body.translation()), body.rotation().angle())
    }

    fn insert(&mut self, body: RigidBody, collider: Collider) -> BodyHandle {
        let handle = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        BodyHandle(handle)
    }

    fn body(&self, handle: BodyHandle) -> &RigidBody {
        self.rigid_body_set
            .get(handle.0)
            .unwrap_or_else(|| panic!("unknown body handle {handle:?}"))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> &mut RigidBody {
        self.rigid_body_set
            .get_mut(handle.0)
            .unwrap_or_else(|| panic!("unknown body handle {handle:?}"))
    }
}

fn with_material(builder: ColliderBuilder, material: BodyMaterial) -> Collider {
    builder
        .density(material.density)
        .friction(material.friction)
        .restitution(material.restitution)
        .build()
}

fn assert_positive_size(size_px: Vec2) {
    assert!(
        size_px.x > 0.0 && size_px.y > 0.0 && size_px.is_finite(),
        "body size must be positive, got {}x{}",
        size_px.x,
        size_px.y
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(ppu: f32) -> PhysicsWorld {
        PhysicsWorld::new(PhysicsConfig::with_pixels_per_unit(ppu))
    }

    fn weightless() -> PhysicsWorld {
        PhysicsWorld::new(PhysicsConfig {
            gravity: Vec2::zero(),
            ..PhysicsConfig::default()
        })
    }

    #[test]
    fn pixel_position_round_trips_through_units() {
        let mut w = world(48.0);
        let h = w.create_dynamic_circle(Vec2::new(100.0, 200.0), 10.0, BodyMaterial::default());

        let units = w.body(h).translation();
        assert!((units.x - 100.0 / 48.0).abs() < 1e-6);
        assert!((units.y - 200.0 / 48.0).abs() < 1e-6);

        let (pos, angle) = w.get_transform(h);
        assert!((pos.x - 100.0).abs() < 1e-3);
        assert!((pos.y - 200.0).abs() < 1e-3);
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn stalled_frame_is_not_simulated() {
        let mut w = world(48.0);
        let h = w.create_dynamic_circle(Vec2::new(100.0, 100.0), 10.0, BodyMaterial::default());
        let before = w.get_transform(h);

        assert_eq!(w.step(1.0 / 60.0), StepOutcome::Skipped);
        assert_eq!(w.step(0.5), StepOutcome::Skipped);
        assert_eq!(w.get_transform(h), before);
        assert_eq!(w.steps_skipped(), 2);
        assert_eq!(w.steps_taken(), 0);
    }

    #[test]
    fn short_frame_advances_under_gravity() {
        let mut w = world(48.0);
        let h = w.create_dynamic_circle(Vec2::new(100.0, 100.0), 10.0, BodyMaterial::default());
        let (before, _) = w.get_transform(h);

        assert_eq!(w.step(1.0 / 120.0), StepOutcome::Advanced);
        let (after, _) = w.get_transform(h);
        // +Y is down in pixel space.
        assert!(after.y > before.y, "{after:?} should be below {before:?}");
    }

    #[test]
    fn static_body_stays_put() {
        let mut w = world(40.0);
        let floor = w.create_static_body(Vec2::new(400.0, 590.0), Vec2::new(800.0, 20.0));
        for _ in 0..10 {
            w.step(1.0 / 120.0);
        }
        let (pos, _) = w.get_transform(floor);
        assert!((pos.x - 400.0).abs() < 1e-3);
        assert!((pos.y - 590.0).abs() < 1e-3);
    }

    #[test]
    fn force_moves_body_only_after_a_real_step() {
        let mut w = weightless();
        let h = w.create_dynamic_rect(Vec2::new(200.0, 200.0), Vec2::new(20.0, 20.0), BodyMaterial::default());
        let (start, _) = w.get_transform(h);

        w.apply_force(h, Vec2::new(50_000.0, 0.0));
        assert_eq!(w.step(1.0), StepOutcome::Skipped);
        assert_eq!(w.get_transform(h).0, start);

        w.apply_force(h, Vec2::new(50_000.0, 0.0));
        assert_eq!(w.step(1.0 / 120.0), StepOutcome::Advanced);
        let (moved, _) = w.get_transform(h);
        assert!(moved.x > start.x);
        assert!((moved.y - start.y).abs() < 1e-4);
    }

    #[test]
    fn impulse_sets_body_in_motion() {
        let mut w = weightless();
        let h = w.create_dynamic_circle(Vec2::new(200.0, 200.0), 8.0, BodyMaterial::default());
        w.apply_impulse(h, Vec2::new(0.0, -100.0));
        w.step(1.0 / 120.0);
        w.step(1.0 / 120.0);
        assert!(w.get_transform(h).0.y < 200.0);
    }

    #[test]
    fn boundary_walls_keep_bodies_inside() {
        let mut w = world(48.0);
        let viewport = Viewport::new(480.0, 320.0);
        let walls = w.create_boundary_walls(viewport, 20.0);
        assert_eq!(walls.len(), 4);

        let ball = w.create_dynamic_circle(Vec2::new(240.0, 280.0), 10.0, BodyMaterial::default());
        for _ in 0..240 {
            w.step(1.0 / 120.0);
        }
        let (pos, _) = w.get_transform(ball);
        assert!(pos.y <= viewport.height, "ball fell through the floor: {pos:?}");
        assert_eq!(w.body_count(), 5);
    }

    #[test]
    #[should_panic(expected = "body radius must be positive")]
    fn zero_radius_body_panics() {
        world(48.0).create_dynamic_circle(Vec2::zero(), 0.0, BodyMaterial::default());
    }

    #[test]
    #[should_panic(expected = "body size must be positive")]
    fn negative_size_body_panics() {
        world(48.0).create_static_body(Vec2::zero(), Vec2::new(10.0, -1.0));
    }
}

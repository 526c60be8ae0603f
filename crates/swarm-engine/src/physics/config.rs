use crate::coords::Vec2;

/// Physics World Adapter configuration.
///
/// The simulation runs in its own units; `pixels_per_unit` is the one factor
/// used for every pixel ↔ unit conversion (positions, sizes, forces,
/// impulses). Simulation axes follow pixel axes, so +Y points down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhysicsConfig {
    pub pixels_per_unit: f32,

    /// Gravity in simulation units per second squared.
    pub gravity: Vec2,

    /// Steps with `dt >= max_step` are dropped, not sub-stepped.
    pub max_step: f32,

    pub velocity_iterations: usize,
    pub position_iterations: usize,
}

impl PhysicsConfig {
    pub fn with_pixels_per_unit(pixels_per_unit: f32) -> Self {
        Self {
            pixels_per_unit,
            ..Self::default()
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: 48.0,
            gravity: Vec2::new(0.0, 9.81),
            max_step: 1.0 / 60.0,
            velocity_iterations: 6,
            position_iterations: 2,
        }
    }
}

/// Surface and mass properties for a dynamic body.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BodyMaterial {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for BodyMaterial {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.3,
            restitution: 0.5,
        }
    }
}

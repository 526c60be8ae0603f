use rand::Rng;

use crate::coords::{CoordMapper, Rgb, Vec2};
use crate::instances::{Instance, InstanceStore, Shape};
use crate::physics::{BodyHandle, BodyMaterial, PhysicsWorld};

/// Creates a dynamic body for `shape_px` and appends the matching instance.
///
/// The only place physics-backed slots are created, so body and instance
/// always share an index.
pub(super) fn attach(
    world: &mut PhysicsWorld,
    store: &mut InstanceStore<BodyHandle>,
    mapper: &CoordMapper,
    center_px: Vec2,
    shape_px: Shape,
    material: BodyMaterial,
    color: Rgb,
) -> usize {
    let handle = match shape_px {
        Shape::Circle { radius } => world.create_dynamic_circle(center_px, radius, material),
        Shape::Rect { width, height } => {
            world.create_dynamic_rect(center_px, Vec2::new(width, height), material)
        }
    };

    let shape = shape_px.scaled(mapper.len_to_normalized(1.0));
    store.push(Instance::new(mapper.to_normalized(center_px), shape, color), handle)
}

/// Copies every body pose into its instance slot.
pub(super) fn sync_poses(
    world: &PhysicsWorld,
    store: &mut InstanceStore<BodyHandle>,
    mapper: &CoordMapper,
) {
    store.for_each_mut(|_, inst, handle| {
        let (pos_px, angle) = world.get_transform(*handle);
        inst.position = mapper.to_normalized(pos_px);
        inst.angle = mapper.angle_to_normalized(angle);
    });
}

pub(super) fn random_color(rng: &mut impl Rng) -> Rgb {
    Rgb::new(rng.random(), rng.random(), rng.random())
}

/// Circle of radius `r` or square of side `2r`, picked with `rect_chance`.
pub(super) fn random_shape(rng: &mut impl Rng, size_px: (f32, f32), rect_chance: f64) -> Shape {
    let r = if size_px.0 < size_px.1 {
        rng.random_range(size_px.0..=size_px.1)
    } else {
        size_px.0
    };
    if rng.random_bool(rect_chance) {
        Shape::square(2.0 * r)
    } else {
        Shape::circle(r)
    }
}

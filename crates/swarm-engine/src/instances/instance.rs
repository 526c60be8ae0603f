use bytemuck::{Pod, Zeroable};

use crate::coords::{Rgb, Vec2};

/// Geometry of one instance, in the same units as its position.
///
/// On the GPU this is carried by the `scale` attribute: `scale.y == 0` marks a
/// circle of radius `scale.x`, any positive `scale.y` a rectangle with
/// half-extents `(scale.x, scale.y)`. `scale.x` is always positive.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    /// Full extents; the packed scale holds the halves.
    Rect { width: f32, height: f32 },
}

impl Shape {
    #[inline]
    pub fn circle(radius: f32) -> Self {
        assert!(radius > 0.0 && radius.is_finite(), "circle radius must be positive, got {radius}");
        Shape::Circle { radius }
    }

    #[inline]
    pub fn rect(width: f32, height: f32) -> Self {
        assert!(
            width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite(),
            "rect extents must be positive, got {width}x{height}"
        );
        Shape::Rect { width, height }
    }

    #[inline]
    pub fn square(side: f32) -> Self {
        Self::rect(side, side)
    }

    /// Same shape with every extent multiplied by `k` (unit conversion).
    #[inline]
    pub fn scaled(self, k: f32) -> Self {
        match self {
            Shape::Circle { radius } => Shape::circle(radius * k),
            Shape::Rect { width, height } => Shape::rect(width * k, height * k),
        }
    }

    /// Packs into the GPU `scale` attribute.
    #[inline]
    pub fn to_scale(self) -> [f32; 2] {
        match self {
            Shape::Circle { radius } => [radius, 0.0],
            Shape::Rect { width, height } => [width * 0.5, height * 0.5],
        }
    }

    /// Unpacks a GPU `scale` attribute.
    pub fn from_scale(scale: [f32; 2]) -> Self {
        if scale[1] == 0.0 {
            Shape::circle(scale[0])
        } else {
            Shape::rect(scale[0] * 2.0, scale[1] * 2.0)
        }
    }

    /// Half-extents of the quad that carries the shape.
    #[inline]
    pub fn half_extents(self) -> Vec2 {
        match self {
            Shape::Circle { radius } => Vec2::new(radius, radius),
            Shape::Rect { width, height } => Vec2::new(width * 0.5, height * 0.5),
        }
    }

    /// Fragment coverage test in quad-local coordinates (`[-1, 1]²`).
    ///
    /// Mirrors the discard rule in `shapes.wgsl`.
    #[inline]
    pub fn covers(self, local: Vec2) -> bool {
        let inside_quad = local.x.abs() <= 1.0 && local.y.abs() <= 1.0;
        match self {
            Shape::Circle { .. } => inside_quad && local.x * local.x + local.y * local.y <= 1.0,
            Shape::Rect { .. } => inside_quad,
        }
    }
}

/// One renderable shape.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Instance {
    /// Center, normalized units.
    pub position: Vec2,
    pub shape: Shape,
    pub color: Rgb,
    /// Radians, counter-clockwise.
    pub angle: f32,
}

impl Instance {
    #[inline]
    pub fn new(position: Vec2, shape: Shape, color: Rgb) -> Self {
        Self { position, shape, color, angle: 0.0 }
    }

    #[inline]
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    #[inline]
    pub fn to_raw(&self) -> InstanceRaw {
        InstanceRaw {
            position: self.position.to_array(),
            scale: self.shape.to_scale(),
            color: self.color.to_array(),
            angle: self.angle,
        }
    }

    /// World-space corners of the instance quad, in the order of `QUAD_CORNERS`.
    ///
    /// CPU mirror of `vs_main`: scale the unit quad, rotate, translate.
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.shape.half_extents();
        crate::render::QUAD_CORNERS.map(|c| {
            let local = Vec2::new(c[0] * half.x, c[1] * half.y);
            local.rotated(self.angle) + self.position
        })
    }
}

/// GPU wire format of an instance (32 bytes, tightly packed).
///
///  offset  0  position  [f32; 2]
///  offset  8  scale     [f32; 2]   (.y == 0 → circle)
///  offset 16  color     [f32; 3]
///  offset 28  angle     f32
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub position: [f32; 2],
    pub scale: [f32; 2],
    pub color: [f32; 3],
    pub angle: f32,
}

impl InstanceRaw {
    pub const SIZE: u64 = std::mem::size_of::<InstanceRaw>() as u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn raw_layout_is_32_bytes() {
        assert_eq!(InstanceRaw::SIZE, 32);
        assert_eq!(std::mem::offset_of!(InstanceRaw, scale), 8);
        assert_eq!(std::mem::offset_of!(InstanceRaw, color), 16);
        assert_eq!(std::mem::offset_of!(InstanceRaw, angle), 28);
    }

    #[test]
    fn circle_packs_with_zero_sentinel() {
        assert_eq!(Shape::circle(0.025).to_scale(), [0.025, 0.0]);
        assert_eq!(Shape::from_scale([0.025, 0.0]), Shape::Circle { radius: 0.025 });
    }

    #[test]
    fn rect_packs_half_extents() {
        assert_eq!(Shape::rect(0.2, 0.1).to_scale(), [0.1, 0.05]);
        assert_eq!(Shape::from_scale([0.1, 0.05]), Shape::Rect { width: 0.2, height: 0.1 });
    }

    #[test]
    fn circle_quad_is_square_of_radius() {
        let inst = Instance::new(Vec2::new(0.5, -0.5), Shape::circle(0.1), Rgb::white());
        let c = inst.corners();
        assert!(close(c[0], Vec2::new(0.6, -0.4)));
        assert!(close(c[2], Vec2::new(0.4, -0.6)));
    }

    #[test]
    fn circle_coverage_cuts_quad_corners() {
        let circle = Shape::circle(1.0);
        assert!(circle.covers(Vec2::new(0.0, 0.0)));
        assert!(circle.covers(Vec2::new(1.0, 0.0)));
        assert!(circle.covers(Vec2::new(0.7, 0.7)));
        assert!(!circle.covers(Vec2::new(0.9, 0.9)));
        assert!(!circle.covers(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn rect_coverage_fills_quad() {
        let rect = Shape::rect(0.2, 0.1);
        assert!(rect.covers(Vec2::new(1.0, 1.0)));
        assert!(rect.covers(Vec2::new(-0.99, 0.99)));
        assert!(!rect.covers(Vec2::new(1.01, 0.0)));
    }

    #[test]
    fn rect_geometry_spans_width_by_height() {
        let inst = Instance::new(Vec2::zero(), Shape::rect(0.4, 0.2), Rgb::white());
        let c = inst.corners();
        let xs = c.map(|p| p.x);
        let ys = c.map(|p| p.y);
        let w = xs.iter().cloned().fold(f32::MIN, f32::max) - xs.iter().cloned().fold(f32::MAX, f32::min);
        let h = ys.iter().cloned().fold(f32::MIN, f32::max) - ys.iter().cloned().fold(f32::MAX, f32::min);
        assert!((w - 0.4).abs() < 1e-6);
        assert!((h - 0.2).abs() < 1e-6);
    }

    #[test]
    fn rotated_rect_corners_follow_angle() {
        let inst = Instance::new(Vec2::zero(), Shape::rect(2.0, 1.0), Rgb::white())
            .with_angle(std::f32::consts::FRAC_PI_2);
        // Top-right corner (1, 0.5) rotates a quarter turn to (-0.5, 1).
        assert!(close(inst.corners()[0], Vec2::new(-0.5, 1.0)));
    }

    #[test]
    #[should_panic(expected = "circle radius must be positive")]
    fn zero_radius_is_rejected() {
        let _ = Shape::circle(0.0);
    }

    #[test]
    #[should_panic(expected = "rect extents must be positive")]
    fn negative_rect_is_rejected() {
        let _ = Shape::rect(1.0, -1.0);
    }
}

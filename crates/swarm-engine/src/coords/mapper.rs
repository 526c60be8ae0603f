use glam::Mat4;

use super::{Vec2, Viewport};

/// Maps a pixel position (top-left origin, +Y down) to normalized view units
/// (center origin, +Y up, X scaled by the aspect ratio).
///
/// `(0, 0)` lands on `(-aspect, 1)`, `(w, h)` on `(aspect, -1)`.
#[inline]
pub fn pixel_to_normalized(px: f32, py: f32, width: f32, height: f32) -> Vec2 {
    let aspect = width / height;
    Vec2::new(-aspect + (2.0 * px / width) * aspect, 1.0 - 2.0 * py / height)
}

/// Converts a pixel length (radius, half-extent) to normalized view units.
///
/// Both axes share the same factor because X is aspect-corrected.
#[inline]
pub fn pixel_len_to_normalized(len: f32, height: f32) -> f32 {
    2.0 * len / height
}

/// OpenGL-convention orthographic projection.
///
/// Diagonal `(2/(r-l), 2/(t-b), -2/(f-n), 1)`, translation
/// `(-(r+l)/(r-l), -(t+b)/(t-b), -(f+n)/(f-n))`.
#[inline]
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::orthographic_rh_gl(left, right, bottom, top, near, far)
}

/// Pixel → normalized mapper bound to one window size, plus the projection
/// that frames the normalized space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CoordMapper {
    viewport: Viewport,
    projection: Mat4,
}

impl CoordMapper {
    pub fn new(viewport: Viewport) -> Self {
        assert!(viewport.is_valid(), "invalid viewport {viewport:?}");
        let aspect = viewport.aspect();
        Self {
            viewport,
            projection: orthographic(-aspect, aspect, -1.0, 1.0, -1.0, 1.0),
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.viewport.aspect()
    }

    /// Projection matrix. Computed once; the view never changes.
    #[inline]
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn to_normalized(&self, px: Vec2) -> Vec2 {
        pixel_to_normalized(px.x, px.y, self.viewport.width, self.viewport.height)
    }

    #[inline]
    pub fn len_to_normalized(&self, len: f32) -> f32 {
        pixel_len_to_normalized(len, self.viewport.height)
    }

    /// Converts an angle measured in pixel space (+Y down) to view space (+Y up).
    ///
    /// Flipping Y mirrors the rotation direction.
    #[inline]
    pub fn angle_to_normalized(&self, angle: f32) -> f32 {
        -angle
    }

    /// Inclusive bounds of the visible normalized space: `(-aspect, -1)`, `(aspect, 1)`.
    #[inline]
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let aspect = self.aspect();
        (Vec2::new(-aspect, -1.0), Vec2::new(aspect, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f32 = 1920.0;
    const H: f32 = 1080.0;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn corners_and_center_map_to_extremes() {
        let aspect = W / H;
        let cases = [
            ((0.0, 0.0), Vec2::new(-aspect, 1.0)),
            ((W, 0.0), Vec2::new(aspect, 1.0)),
            ((0.0, H), Vec2::new(-aspect, -1.0)),
            ((W, H), Vec2::new(aspect, -1.0)),
            ((W / 2.0, H / 2.0), Vec2::new(0.0, 0.0)),
        ];
        for ((px, py), expected) in cases {
            let got = pixel_to_normalized(px, py, W, H);
            assert!(close(got, expected), "({px}, {py}) -> {got:?}, expected {expected:?}");
        }
    }

    #[test]
    fn square_window_has_unit_aspect() {
        let got = pixel_to_normalized(0.0, 0.0, 800.0, 800.0);
        assert!(close(got, Vec2::new(-1.0, 1.0)));
    }

    #[test]
    fn pixel_lengths_scale_by_height() {
        assert!((pixel_len_to_normalized(540.0, H) - 1.0).abs() < 1e-6);
        assert!((pixel_len_to_normalized(10.0, H) - 20.0 / H).abs() < 1e-6);
    }

    #[test]
    fn orthographic_terms() {
        let (l, r, b, t, n, f) = (-2.0f32, 4.0, -1.0, 3.0, -1.0, 5.0);
        let m = orthographic(l, r, b, t, n, f).to_cols_array_2d();

        assert!((m[0][0] - 2.0 / (r - l)).abs() < 1e-6);
        assert!((m[1][1] - 2.0 / (t - b)).abs() < 1e-6);
        assert!((m[2][2] - -2.0 / (f - n)).abs() < 1e-6);
        assert!((m[3][3] - 1.0).abs() < 1e-6);

        assert!((m[3][0] - -(r + l) / (r - l)).abs() < 1e-6);
        assert!((m[3][1] - -(t + b) / (t - b)).abs() < 1e-6);
        assert!((m[3][2] - -(f + n) / (f - n)).abs() < 1e-6);

        assert_eq!(m[0][1], 0.0);
        assert_eq!(m[1][0], 0.0);
    }

    #[test]
    fn mapper_projection_frames_the_normalized_bounds() {
        let mapper = CoordMapper::new(Viewport::new(W, H));
        let (min, max) = mapper.bounds();
        let p = mapper.projection();

        let lo = p.project_point3(glam::Vec3::new(min.x, min.y, 0.0));
        let hi = p.project_point3(glam::Vec3::new(max.x, max.y, 0.0));
        assert!((lo.x + 1.0).abs() < 1e-5 && (lo.y + 1.0).abs() < 1e-5);
        assert!((hi.x - 1.0).abs() < 1e-5 && (hi.y - 1.0).abs() < 1e-5);
        assert!(lo.z.abs() < 1e-6);
    }

    #[test]
    fn mapper_flips_angles() {
        let mapper = CoordMapper::new(Viewport::new(W, H));
        assert_eq!(mapper.angle_to_normalized(0.5), -0.5);
    }

    #[test]
    #[should_panic(expected = "invalid viewport")]
    fn mapper_rejects_empty_viewport() {
        let _ = CoordMapper::new(Viewport::new(0.0, 600.0));
    }
}

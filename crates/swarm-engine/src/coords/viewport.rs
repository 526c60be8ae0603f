/// Window size in pixels.
///
/// The basis for every pixel → normalized conversion. Captured once at startup;
/// the view never changes afterwards.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Width over height.
    #[inline]
    pub fn aspect(self) -> f32 {
        self.width / self.height
    }
}

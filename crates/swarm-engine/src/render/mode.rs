/// How instances are rasterized. Owned by the frame loop, passed to each draw.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RenderMode {
    #[default]
    Fill,
    /// Triangle edges of every instance quad, no circle cut-out.
    Wireframe,
}

impl RenderMode {
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Fill => RenderMode::Wireframe,
            RenderMode::Wireframe => RenderMode::Fill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_round_trips() {
        assert_eq!(RenderMode::default(), RenderMode::Fill);
        assert_eq!(RenderMode::Fill.toggled(), RenderMode::Wireframe);
        assert_eq!(RenderMode::Fill.toggled().toggled(), RenderMode::Fill);
    }
}

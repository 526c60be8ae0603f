use crate::physics::StepOutcome;
use crate::render::DirtyAttrs;

/// Proof that the simulation ran for the current frame.
///
/// Only the frame loop creates one; uploading consumes it.
#[derive(Debug)]
#[must_use = "a simulated frame must be uploaded before it can be drawn"]
pub struct Simulated {
    outcome: StepOutcome,
    dirty: DirtyAttrs,
}

impl Simulated {
    pub(crate) fn new(outcome: StepOutcome, dirty: DirtyAttrs) -> Self {
        Self { outcome, dirty }
    }

    #[inline]
    pub fn outcome(&self) -> StepOutcome {
        self.outcome
    }

    #[inline]
    pub fn dirty(&self) -> DirtyAttrs {
        self.dirty
    }
}

/// Proof that instance buffers hold the current frame's data.
///
/// Only `ShapeRenderer::upload` creates one; drawing consumes it.
#[derive(Debug)]
#[must_use = "uploaded instances are never drawn"]
pub struct Uploaded {
    count: u32,
}

impl Uploaded {
    pub(crate) fn new(count: u32) -> Self {
        Self { count }
    }

    /// Live instances to draw.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }
}

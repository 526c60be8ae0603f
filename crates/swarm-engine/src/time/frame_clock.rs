use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// One clock per frame loop. The physics gate downstream compares `dt` against
/// its own step limit, so the clamps here only guard against degenerate values:
/// - minimum prevents zero-dt behavior from tight uncapped loops
/// - maximum keeps a debugger pause from producing a multi-minute delta
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock with default clamps.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the clock baseline.
    ///
    /// Called once the GPU resources exist so the first simulated frame does not
    /// see the whole startup time as its delta.
    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    /// Resets the baseline to an explicit timestamp.
    pub fn reset_at(&mut self, now: Instant) {
        self.last = now;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_measures_elapsed_time() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_secs(1));
        let start = Instant::now();
        clock.last = start;

        let ft = clock.tick_at(start + Duration::from_millis(10));
        assert!((ft.dt - 0.010).abs() < 1e-6);
        assert_eq!(ft.frame_index, 0);

        let ft = clock.tick_at(start + Duration::from_millis(15));
        assert!((ft.dt - 0.005).abs() < 1e-6);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn tick_clamps_stalls_and_zero_deltas() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.last = start;

        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);

        let ft = clock.tick_at(start + Duration::from_secs(5));
        assert!((ft.dt - 0.0001).abs() < 1e-7);
    }

    #[test]
    fn reset_excludes_setup_time() {
        let mut clock = FrameClock::new();
        let built = Instant::now();
        clock.last = built;

        // Slow device setup between construction and the first frame.
        let ready = built + Duration::from_millis(120);
        clock.reset_at(ready);

        let ft = clock.tick_at(ready + Duration::from_millis(4));
        assert!((ft.dt - 0.004).abs() < 1e-6);
        assert_eq!(ft.frame_index, 0);
    }
}

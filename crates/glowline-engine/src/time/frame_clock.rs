use std::time::{Duration, Instant};

const DEFAULT_DT_MIN: Duration = Duration::from_micros(100);
const DEFAULT_DT_MAX: Duration = Duration::from_millis(250);

/// Timing for one redraw.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Zero for the first frame, then +1 per tick.
    pub frame_index: u64,
}

/// Produces one `FrameTime` per redraw.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// hand a multi-second step to the next frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(DEFAULT_DT_MIN, DEFAULT_DT_MAX)
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Restarts delta timing, e.g. after the window is restored.
    /// The frame counter keeps counting.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
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
    fn frame_index_starts_at_zero_and_increments() {
        let mut clock = FrameClock::new();
        let t0 = clock.last;
        let indices: Vec<u64> = (1..=3)
            .map(|i| clock.tick_at(t0 + Duration::from_millis(16 * i)).frame_index)
            .collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(clock.frame_index(), 3);
    }

    #[test]
    fn dt_is_clamped_both_ways() {
        let mut clock = FrameClock::new();
        let t0 = clock.last;

        let stalled = clock.tick_at(t0 + Duration::from_secs(5));
        assert_eq!(stalled.dt, DEFAULT_DT_MAX.as_secs_f32());

        let same_instant = clock.tick_at(stalled.now);
        assert_eq!(same_instant.dt, DEFAULT_DT_MIN.as_secs_f32());
    }

    #[test]
    fn reset_keeps_counting_frames() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.reset();
        assert_eq!(clock.tick().frame_index, 1);
    }
}

/// Frame delta bookkeeping over the surface clock.
///
/// The timer never reads a clock itself; callers feed it timestamps in
/// seconds (typically `Surface::time`). `delta` holds the value produced by
/// the most recent advance and is what layers receive for the following
/// frame, so the first frame of a loop always observes 0.0.
///
/// Deltas are reported raw, without clamping. A stall under a debugger shows
/// up as a large delta rather than being silently capped.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    last: f64,
    delta: f64,
    frame_index: u64,
}

impl FrameTimer {
    /// Creates a timer with a zero baseline.
    ///
    /// The baseline matches the surface clock's origin, so the first
    /// `advance` measures time since surface creation. Use `reset` to
    /// re-baseline after a long pause between construction and the loop.
    pub fn new() -> Self {
        Self {
            last: 0.0,
            delta: 0.0,
            frame_index: 0,
        }
    }

    /// Delta produced by the most recent advance, in seconds.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of advances performed so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Standard end-of-frame advance: delta becomes `now - last`.
    ///
    /// Non-negative as long as `now` comes from a monotonic clock.
    pub fn advance(&mut self, now: f64) {
        self.delta = now - self.last;
        self.last = now;
        self.frame_index = self.frame_index.wrapping_add(1);
    }

    /// Single-step advance: delta becomes `last - now`, the inverted sign.
    ///
    /// The single-step drive reports inverted deltas as part of its
    /// contract; that path calls this, everything else calls `advance`.
    pub fn advance_negated(&mut self, now: f64) {
        self.delta = self.last - now;
        self.last = now;
        self.frame_index = self.frame_index.wrapping_add(1);
    }

    /// Re-baselines the timer; the next delta is measured from `now`.
    pub fn reset(&mut self, now: f64) {
        self.last = now;
        self.delta = 0.0;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── advance ───────────────────────────────────────────────────────────

    #[test]
    fn first_delta_is_zero() {
        let timer = FrameTimer::new();
        assert_eq!(timer.delta(), 0.0);
    }

    #[test]
    fn advance_measures_elapsed_time() {
        let mut timer = FrameTimer::new();
        timer.advance(0.5);
        assert_eq!(timer.delta(), 0.5);
        timer.advance(0.75);
        assert_eq!(timer.delta(), 0.25);
    }

    #[test]
    fn advance_is_non_negative_under_monotonic_time() {
        let mut timer = FrameTimer::new();
        for (i, now) in [0.1, 0.2, 0.2, 0.35].into_iter().enumerate() {
            timer.advance(now);
            assert!(timer.delta() >= 0.0, "frame {i} produced a negative delta");
        }
    }

    #[test]
    fn frame_index_counts_advances() {
        let mut timer = FrameTimer::new();
        timer.advance(0.1);
        timer.advance_negated(0.2);
        timer.advance(0.3);
        assert_eq!(timer.frame_index(), 3);
    }

    // ── advance_negated ───────────────────────────────────────────────────

    #[test]
    fn negated_advance_inverts_the_sign() {
        let mut timer = FrameTimer::new();
        timer.advance(1.0);
        timer.advance_negated(1.5);
        assert_eq!(timer.delta(), -0.5);
    }

    #[test]
    fn negated_advance_still_moves_the_baseline() {
        let mut timer = FrameTimer::new();
        timer.advance_negated(1.0);
        assert_eq!(timer.delta(), -1.0);
        timer.advance(1.25);
        assert_eq!(timer.delta(), 0.25);
    }

    // ── reset ─────────────────────────────────────────────────────────────

    #[test]
    fn reset_rebaselines_and_zeroes_delta() {
        let mut timer = FrameTimer::new();
        timer.advance(10.0);
        timer.reset(20.0);
        assert_eq!(timer.delta(), 0.0);
        timer.advance(20.5);
        assert_eq!(timer.delta(), 0.5);
    }
}

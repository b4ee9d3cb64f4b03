/// Wall-clock frame timer.
/// Tracks seconds since startup and the delta between consecutive frames,
/// the way a render loop samples its clock once per iteration.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    /// Time of the most recent frame, in seconds since startup.
    elapsed: f32,
    /// Seconds between the two most recent frames.
    delta: f32,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new frame at `now` seconds since startup. Returns the frame delta.
    ///
    /// The first frame's delta is measured from zero. A clock that goes
    /// backwards yields a zero delta instead of a negative one.
    pub fn advance(&mut self, now: f32) -> f32 {
        self.delta = (now - self.elapsed).max(0.0);
        self.elapsed = now.max(self.elapsed);
        self.frames += 1;
        self.delta
    }

    /// Seconds since startup at the current frame.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seconds since the previous frame.
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of frames started so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_delta_is_measured_from_zero() {
        let mut clock = FrameClock::new();
        let dt = clock.advance(0.5);
        assert!((dt - 0.5).abs() < 1e-6);
        assert!((clock.elapsed() - 0.5).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn delta_between_frames() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        let dt = clock.advance(1.016);
        assert!((dt - 0.016).abs() < 1e-5);
        assert!((clock.delta() - 0.016).abs() < 1e-5);
    }

    #[test]
    fn backwards_clock_gives_zero_delta() {
        let mut clock = FrameClock::new();
        clock.advance(2.0);
        let dt = clock.advance(1.0);
        assert_eq!(dt, 0.0);
        assert!((clock.elapsed() - 2.0).abs() < 1e-6);
    }
}

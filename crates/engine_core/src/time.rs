//! Frame timing for the render loop.

use std::time::{Duration, Instant};

/// Longest frame delta handed to simulation code; a stall (window drag, breakpoint)
/// must not make the camera jump.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Weight of the newest frame in the smoothed FPS readout.
const FPS_SMOOTHING: f32 = 0.1;

/// Tracks delta time between redraws and a smoothed frame rate for the HUD.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    smoothed_fps: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            smoothed_fps: 0.0,
        }
    }

    /// Call once at the start of each frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.advance(now - self.last_frame);
        self.last_frame = now;
    }

    fn advance(&mut self, raw: Duration) {
        self.delta = raw.min(MAX_FRAME_DELTA);
        self.frame_count += 1;
        let secs = raw.as_secs_f32();
        if secs > 0.0 {
            let fps = 1.0 / secs;
            self.smoothed_fps = if self.smoothed_fps == 0.0 {
                fps
            } else {
                self.smoothed_fps + (fps - self.smoothed_fps) * FPS_SMOOTHING
            };
        }
    }

    /// Clamped delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_clock_clamps_long_stalls() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_secs(3));
        assert!((clock.delta_seconds() - 0.1).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn frame_clock_smooths_fps() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_millis(10));
        assert!((clock.fps() - 100.0).abs() < 0.5);
        clock.advance(Duration::from_millis(20));
        // One step toward 50 fps, weighted by FPS_SMOOTHING.
        assert!((clock.fps() - 95.0).abs() < 0.5);
    }
}

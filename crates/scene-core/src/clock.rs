//! Single source of frame time for a scene.

use crate::constants::MAX_FRAME_DT_SEC;
use instant::Instant;
use std::time::Duration;

/// Produces a capped, monotonic time delta per tick and accumulates scene time.
#[derive(Clone, Debug)]
pub struct FrameClock {
    last: Option<Instant>,
    scene_time: f64,
    max_dt: Duration,
    frames: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_dt(Duration::from_secs_f32(MAX_FRAME_DT_SEC))
    }

    pub fn with_max_dt(max_dt: Duration) -> Self {
        Self {
            last: None,
            scene_time: 0.0,
            max_dt,
            frames: 0,
        }
    }

    /// Elapsed wall time since the previous tick. The first tick returns zero.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = match self.last {
            Some(prev) if now > prev => now - prev,
            _ => Duration::ZERO,
        };
        self.last = Some(now);
        self.advance(dt)
    }

    /// Fixed-step tick: applies `dt` (capped) without reading the wall clock.
    pub fn advance(&mut self, dt: Duration) -> Duration {
        let dt = dt.min(self.max_dt);
        self.scene_time += dt.as_secs_f64();
        self.frames += 1;
        dt
    }

    /// Seconds of animation time accumulated so far, for `sin(time + offset)` style phases.
    pub fn scene_time(&self) -> f64 {
        self.scene_time
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn max_dt(&self) -> Duration {
        self.max_dt
    }
}

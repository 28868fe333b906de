use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Minimal frame clock - just tracks delta time
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    /// Create new clock starting now
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Get delta time since last tick and advance clock
    /// Returns delta in seconds
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    /// Reset clock to current time
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of the absolute time idle motion is evaluated at
pub trait TimeSource {
    /// Seconds, with enough precision for epoch-sized values
    fn now_secs(&mut self) -> f64;
}

/// Wall-clock seconds since the Unix epoch
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_secs(&mut self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Deterministic clock advancing a fixed step per reading
#[derive(Debug, Clone, Copy)]
pub struct SteppedClock {
    step: f64,
    readings: u64,
}

impl SteppedClock {
    pub fn new(hz: f64) -> Self {
        Self {
            step: 1.0 / hz,
            readings: 0,
        }
    }
}

impl TimeSource for SteppedClock {
    fn now_secs(&mut self) -> f64 {
        let t = self.readings as f64 * self.step;
        self.readings += 1;
        t
    }
}

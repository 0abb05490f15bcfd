//! Frame timing

use std::collections::VecDeque;
use std::time::Instant;

/// Wall-clock frame timer
///
/// Used only when no fixed delta is configured; everything downstream of the
/// engine consumes the delta it is handed.
#[derive(Debug, Clone)]
pub struct Timer {
    started: Instant,
    last_tick: Instant,
    ticks: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a timer starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_tick: now,
            ticks: 0,
        }
    }

    /// Restart from now, dropping time spent before the first frame
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Seconds since the previous tick (or since creation)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.ticks += 1;
        delta
    }

    /// Seconds since creation or the last reset
    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Ticks since creation or the last reset
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Rolling frame rate estimate over the last few frame deltas
///
/// Fed with the same dt the engine hands to scenes, so adaptive physics
/// stays deterministic under a scripted dt sequence.
#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    samples: VecDeque<f32>,
    capacity: usize,
    sum: f32,
}

impl FrameRateMeter {
    /// Create a meter averaging over `capacity` frames
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
            sum: 0.0,
        }
    }

    /// Record one frame delta
    pub fn record(&mut self, delta_time: f32) {
        if delta_time <= 0.0 {
            return;
        }
        if self.samples.len() == self.capacity {
            if let Some(old) = self.samples.pop_front() {
                self.sum -= old;
            }
        }
        self.samples.push_back(delta_time);
        self.sum += delta_time;
    }

    /// Average frames per second, `None` until a sample is recorded
    #[allow(clippy::cast_precision_loss)]
    pub fn fps(&self) -> Option<f32> {
        if self.samples.is_empty() || self.sum <= 0.0 {
            None
        } else {
            Some(self.samples.len() as f32 / self.sum)
        }
    }

    /// Forget all samples
    pub fn reset(&mut self) {
        self.samples.clear();
        self.sum = 0.0;
    }
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new(30)
    }
}

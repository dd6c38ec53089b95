//! Shared utilities

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Simple deterministic RNG using xorshift64.
/// Drives light flicker, so a seeded light animates the same way every run.
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // Ensure non-zero
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Get a random i32 in [min, max]
    ///
    /// # Panics
    /// Panics in debug builds if `min > max`
    #[inline]
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "range_i32: min ({}) must be <= max ({})", min, max);
        if min >= max {
            return min;
        }
        let range = (max as i64 - min as i64 + 1) as u64;
        (min as i64 + (self.next_u64() % range) as i64) as i32
    }
}

/// Frames per second averaged over the last `window` frames
pub struct FpsCounter {
    frames: VecDeque<Duration>,
    last: Instant,
    window: usize,
}

impl FpsCounter {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            frames: VecDeque::with_capacity(window),
            last: Instant::now(),
            window,
        }
    }

    /// Record a frame boundary and return the rolling average fps
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.frames.push_back(now - self.last);
        self.last = now;
        if self.frames.len() > self.window {
            self.frames.pop_front();
        }

        let total: f32 = self.frames.iter().map(Duration::as_secs_f32).sum();
        if total > 0.0 {
            self.frames.len() as f32 / total
        } else {
            0.0
        }
    }
}

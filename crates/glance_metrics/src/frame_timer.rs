//! Frame pacing statistics
//!
//! Measures the interval between consecutive frame starts, so the numbers
//! include event polling, UI building, and presentation.

use super::ring_buffer::RingBuffer;
use std::time::{Duration, Instant};

pub struct FrameTimer {
    last_tick: Option<Instant>,
    intervals: RingBuffer<Duration>,
    frames: u64,
}

impl FrameTimer {
    /// Keep the last `capacity` frame intervals.
    pub fn new(capacity: usize) -> Self {
        Self {
            last_tick: None,
            intervals: RingBuffer::new(capacity),
            frames: 0,
        }
    }

    /// Mark the start of a frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(previous) = self.last_tick.replace(now) {
            self.intervals.push(now.duration_since(previous));
        }
        self.frames += 1;
    }

    pub fn reset(&mut self) {
        self.last_tick = None;
        self.intervals.clear();
        self.frames = 0;
    }

    /// Number of `tick` calls since creation or the last `reset`.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn fps(&self) -> f64 {
        let avg = self.intervals.average();
        if avg.as_secs_f64() > 0.0 {
            1.0 / avg.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.intervals.average().as_secs_f64() * 1000.0
    }

    pub fn frame_time_range_ms(&self) -> (f64, f64) {
        let (min, max) = self.intervals.min_max();
        (min.as_secs_f64() * 1000.0, max.as_secs_f64() * 1000.0)
    }
}

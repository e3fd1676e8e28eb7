//! Glance Metrics - timing utilities for instrumenting host code and frames
//!
//! [`TaskTimer`] is a plain stopwatch and is always available. Rolling frame
//! statistics ([`FrameTimer`], [`RingBuffer`]) sit behind a feature flag and
//! vanish when it is off.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable rolling frame statistics (default: disabled)
//!
//! # Usage
//!
//! ```
//! use glance_metrics::TaskTimer;
//!
//! let mut timer = TaskTimer::new();
//! timer.start();
//! // ... do work ...
//! timer.stop();
//! println!("took {:.6}s", timer.elapsed());
//! ```
//!
//! Without `metrics`, `FrameTimer` and `RingBuffer` are zero-sized stubs
//! reporting zeros.

mod task_timer;

#[cfg(feature = "metrics")]
mod frame_timer;
#[cfg(feature = "metrics")]
mod ring_buffer;

pub use task_timer::TaskTimer;

#[cfg(feature = "metrics")]
pub use frame_timer::FrameTimer;
#[cfg(feature = "metrics")]
pub use ring_buffer::RingBuffer;

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
pub struct FrameTimer;

#[cfg(not(feature = "metrics"))]
impl FrameTimer {
    pub fn new(_capacity: usize) -> Self { Self }
    pub fn tick(&mut self) {}
    pub fn reset(&mut self) {}
    pub fn frames(&self) -> u64 { 0 }
    pub fn fps(&self) -> f64 { 0.0 }
    pub fn frame_time_ms(&self) -> f64 { 0.0 }
    pub fn frame_time_range_ms(&self) -> (f64, f64) { (0.0, 0.0) }
}

#[cfg(not(feature = "metrics"))]
pub struct RingBuffer<T>(std::marker::PhantomData<T>);

#[cfg(not(feature = "metrics"))]
impl<T> RingBuffer<T> {
    pub fn new(_capacity: usize) -> Self { Self(std::marker::PhantomData) }
    pub fn push(&mut self, _value: T) {}
    pub fn clear(&mut self) {}
    pub fn average(&self) -> T where T: Default { T::default() }
}

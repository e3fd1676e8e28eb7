//! Stopwatch for instrumenting arbitrary spans of work
//!
//! A `TaskTimer` records two monotonic instants and reports the distance
//! between them. It does not validate call order: pairing `start` with a
//! later `stop` is the caller's job.

use std::time::Instant;

/// Start/stop stopwatch.
///
/// Deliberately not `Clone` or `Copy`: a measurement in flight belongs to
/// exactly one owner. Not meant to be shared across threads.
#[derive(Debug, Default)]
pub struct TaskTimer {
    start_instant: Option<Instant>,
    end_instant: Option<Instant>,
}

impl TaskTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the start instant, overwriting any previous one.
    pub fn start(&mut self) {
        self.start_instant = Some(Instant::now());
    }

    /// Capture the end instant, overwriting any previous one.
    pub fn stop(&mut self) {
        self.end_instant = Some(Instant::now());
    }

    /// Seconds between the last `start` and the last `stop`.
    ///
    /// Returns `0.0` until both instants have been captured. Negative when
    /// the last `stop` happened before the last `start`; while a measurement
    /// is in flight the value still refers to the previous `stop`.
    pub fn elapsed(&self) -> f64 {
        let (Some(start), Some(end)) = (self.start_instant, self.end_instant) else {
            return 0.0;
        };

        if end >= start {
            end.duration_since(start).as_secs_f64()
        } else {
            -start.duration_since(end).as_secs_f64()
        }
    }

    /// Run `f` between a `start` and a `stop`, returning its result.
    pub fn measure<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.start();
        let result = f();
        self.stop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_elapsed_tracks_sleep() {
        let mut timer = TaskTimer::new();

        timer.start();
        thread::sleep(Duration::from_millis(50));
        timer.stop();

        let elapsed = timer.elapsed();
        assert!(elapsed >= 0.05, "elapsed {elapsed} shorter than the sleep");
        assert!(elapsed < 0.5, "elapsed {elapsed} far beyond the sleep");
    }

    #[test]
    fn test_immediate_stop_is_small_and_non_negative() {
        let mut timer = TaskTimer::new();
        timer.start();
        timer.stop();

        let elapsed = timer.elapsed();
        assert!(elapsed >= 0.0);
        assert!(elapsed < 0.01);
    }

    #[test]
    fn test_cycles_do_not_accumulate() {
        let mut timer = TaskTimer::new();

        timer.start();
        thread::sleep(Duration::from_millis(60));
        timer.stop();
        let first = timer.elapsed();

        timer.start();
        timer.stop();
        let second = timer.elapsed();

        assert!(first >= 0.06);
        assert!(second < 0.01, "second cycle reported {second}, history leaked in");
    }

    #[test]
    fn test_unpaired_reads_default_to_zero() {
        let mut timer = TaskTimer::new();
        assert_eq!(timer.elapsed(), 0.0);

        timer.stop();
        assert_eq!(timer.elapsed(), 0.0);
    }

    #[test]
    fn test_stop_before_start_goes_negative() {
        let mut timer = TaskTimer::new();
        timer.stop();
        thread::sleep(Duration::from_millis(5));
        timer.start();

        assert!(timer.elapsed() < 0.0);
    }

    #[test]
    fn test_measure_returns_closure_result() {
        let mut timer = TaskTimer::new();
        let value = timer.measure(|| {
            thread::sleep(Duration::from_millis(10));
            42
        });

        assert_eq!(value, 42);
        assert!(timer.elapsed() >= 0.01);
    }
}

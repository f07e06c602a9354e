//! Timing of computations.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct Timed<V> {
    pub value: V,
    pub elapsed: Duration,
}
impl<V> Timed<V> {
    /// Runs `f`, noting how long it took whether or not it succeeded.
    pub fn run(f: impl FnOnce() -> V) -> Self {
        let start_time = Instant::now();
        let value = f();
        Self {
            value,
            elapsed: start_time.elapsed(),
        }
    }
}

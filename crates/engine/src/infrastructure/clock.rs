//! Clock implementations.

use crate::infrastructure::ports::ClockPort;
use chrono::{DateTime, Utc};

/// System clock - uses real time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when a test advances it.
#[cfg(test)]
pub struct ManualClock {
    micros: std::sync::atomic::AtomicI64,
}

#[cfg(test)]
impl ManualClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            micros: std::sync::atomic::AtomicI64::new(start.timestamp_micros()),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let step = by.num_microseconds().expect("step fits in microseconds");
        self.micros
            .fetch_add(step, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
impl ClockPort for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let micros = self.micros.load(std::sync::atomic::Ordering::SeqCst);
        DateTime::from_timestamp_micros(micros).expect("clock within chrono range")
    }
}

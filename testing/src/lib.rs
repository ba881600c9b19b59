//! Testing utilities for the storefront cart architecture.
//!
//! Provides a fluent Given/When/Then harness for reducers plus
//! deterministic stand-ins for the environment traits: a fixed clock
//! and a sequential id generator, so tests can assert on generated
//! cart line identifiers.

pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use storefront_core::environment::{Clock, IdGenerator};

/// Clock that always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a clock pinned to the given instant
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// A fixed clock for deterministic tests
#[must_use]
pub fn test_clock() -> FixedClock {
    // An arbitrary but stable instant.
    let time = Utc
        .with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
        .single()
        .unwrap_or_default();
    FixedClock::new(time)
}

/// Id generator that issues 1, 2, 3, ...
///
/// Deterministic replacement for the production timestamp-derived
/// generator, so tests can predict cart line identifiers.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Create a generator starting at 1
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_stable() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn fixed_clock_drives_the_production_id_generator() {
        use storefront_core::environment::SystemIdGenerator;

        let clock = test_clock();
        let ids = SystemIdGenerator::with_clock(clock);
        let expected = u64::try_from(clock.now().timestamp_millis()).unwrap_or(0);

        assert_eq!(ids.next_id(), expected);
        assert_eq!(ids.next_id(), expected + 1);
    }

    #[test]
    fn sequential_ids_count_up_from_one() {
        let ids = SequentialIds::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.next_id(), 3);
    }
}

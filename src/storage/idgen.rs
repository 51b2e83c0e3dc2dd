//! Record id generation
//!
//! Ids come from a clock-seeded monotonic counter: seeded once from epoch
//! milliseconds at construction, then atomically incremented per insert.
//! Within one store ids are unique and strictly increasing; across
//! independent processes the scheme is collision-resistant, not a
//! uniqueness guarantee. The generation scheme is an implementation
//! detail, not a contract.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) struct IdGenerator {
    next: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        let seed = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            // Pre-epoch clock: the distance still seeds, keeping the
            // handle representable as a non-negative id.
            Err(e) => e.duration().as_millis() as i64,
        };
        Self {
            next: AtomicI64::new(seed.max(0)),
        }
    }

    pub fn next_id(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_non_negative() {
        let ids = IdGenerator::new();
        for _ in 0..100 {
            assert!(ids.next_id() >= 0);
        }
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let ids = IdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
    }
}

//! Timestamp-based account id generation.

use super::model::AccountId;

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Issues account ids from a millisecond clock.
///
/// Ids are strictly increasing for the life of the generator: two calls in
/// the same millisecond, or a clock that steps backwards, yield the last
/// issued value plus one.
pub struct IdGenerator {
    clock: Clock,
    last: Option<i64>,
}

impl IdGenerator {
    /// Create a generator backed by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(|| chrono::Utc::now().timestamp_millis())
    }

    /// Create a generator backed by a custom millisecond clock.
    #[must_use]
    pub fn with_clock(clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            last: None,
        }
    }

    /// Record an id that already exists so later ids sort after it.
    ///
    /// Non-numeric ids are ignored.
    pub fn observe(&mut self, id: &AccountId) {
        if let Some(ts) = id.as_timestamp() {
            self.last = Some(self.last.map_or(ts, |last| last.max(ts)));
        }
    }

    /// Issue the next id.
    pub fn next_id(&mut self) -> AccountId {
        let now = (self.clock)();
        let ts = match self.last {
            Some(last) if now <= last => last.saturating_add(1),
            _ => now,
        };
        self.last = Some(ts);
        AccountId::new(ts.to_string())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdGenerator")
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;

    fn fixed(ms: i64) -> IdGenerator {
        IdGenerator::with_clock(move || ms)
    }

    #[test]
    fn uses_clock_value() {
        let mut ids = fixed(1_718_000_000_000);
        assert_eq!(ids.next_id().as_str(), "1718000000000");
    }

    #[test]
    fn same_millisecond_bumps() {
        let mut ids = fixed(500);
        assert_eq!(ids.next_id().as_str(), "500");
        assert_eq!(ids.next_id().as_str(), "501");
        assert_eq!(ids.next_id().as_str(), "502");
    }

    #[test]
    fn backwards_clock_still_increases() {
        let now = Arc::new(AtomicI64::new(1_000));
        let clock = Arc::clone(&now);
        let mut ids = IdGenerator::with_clock(move || clock.load(Ordering::SeqCst));

        assert_eq!(ids.next_id().as_str(), "1000");
        now.store(900, Ordering::SeqCst);
        assert_eq!(ids.next_id().as_str(), "1001");
        now.store(2_000, Ordering::SeqCst);
        assert_eq!(ids.next_id().as_str(), "2000");
    }

    #[test]
    fn observed_ids_are_skipped() {
        let mut ids = fixed(100);
        ids.observe(&AccountId::new("250"));
        ids.observe(&AccountId::new("not-a-number"));
        ids.observe(&AccountId::new("120"));
        assert_eq!(ids.next_id().as_str(), "251");
    }

    #[test]
    fn system_clock_is_positive() {
        let mut ids = IdGenerator::new();
        assert!(ids.next_id().as_timestamp().unwrap() > 0);
    }
}

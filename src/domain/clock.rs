use chrono::Utc;

/// Source of "now" for entitlement decisions, in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicI64, Ordering};

    use chrono::Duration;

    use super::Clock;

    /// Clock that only moves when told to.
    #[derive(Debug)]
    pub(crate) struct ManualClock {
        now: AtomicI64,
    }

    impl ManualClock {
        pub(crate) fn at(now_ms: i64) -> Self {
            Self {
                now: AtomicI64::new(now_ms),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            self.now.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> i64 {
            self.now.load(Ordering::SeqCst)
        }
    }
}

use std::time::SystemTime;

/// Wall-clock capability injected into the session core so transition
/// logic can be tested without sleeping.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[cfg(test)]
pub mod test_support {
    use super::Clock;
    use std::cell::Cell;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    /// Manually advanced clock for unit tests
    #[derive(Debug)]
    pub struct FakeClock {
        now: Cell<SystemTime>,
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self {
                now: Cell::new(UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
            }
        }

        pub fn advance(&self, d: Duration) {
            self.now.set(self.now.get() + d);
        }

        pub fn advance_secs(&self, secs: u64) {
            self.advance(Duration::from_secs(secs));
        }

        pub fn now(&self) -> SystemTime {
            self.now.get()
        }
    }

    impl Clock for &FakeClock {
        fn now(&self) -> SystemTime {
            self.now.get()
        }
    }
}

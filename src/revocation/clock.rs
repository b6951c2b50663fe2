/// Wall-clock time source for the registry.
///
/// All registry instants are epoch milliseconds, the same time base callers
/// must use for `issued_at` values.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use crate::error::RegistryError;

pub trait Clock: Send + Sync {
    /// Current wall-clock time in epoch milliseconds.
    fn now_millis(&self) -> Result<i64, RegistryError>;
}

/// Reads the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> Result<i64, RegistryError> {
        Ok(chrono::Utc::now().timestamp_millis())
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let millis = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> Result<i64, RegistryError> {
        Ok(self.now.load(Ordering::SeqCst))
    }
}

/// Revocation Registry
///
/// Decides whether a previously issued bearer token must now be rejected,
/// either because it was denied individually (logout, compromise) or because
/// every token of its principal issued before some instant was revoked in bulk
/// (logout everywhere, password reset, account lock).
///
/// Failure policy: the registry never fails its caller. Lookups that hit a
/// store fault (or a panic inside the store) answer `false`, mutations are
/// dropped, and each fault is logged and counted in `RegistryStats`. A faulty
/// registry therefore stops enforcing revocations; watch the fault counters.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use super::clock::{Clock, SystemClock};
use super::store::{InMemoryStore, RevocationStore};
use crate::error::RegistryError;

/// Registry operation, as reported in fault logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Deny,
    IsDenied,
    RevokeAll,
    IsRevoked,
    Housekeeping,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Deny => "deny",
            Operation::IsDenied => "is_denied",
            Operation::RevokeAll => "revoke_all",
            Operation::IsRevoked => "is_revoked",
            Operation::Housekeeping => "housekeeping",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
struct FaultCounters {
    deny: AtomicU64,
    is_denied: AtomicU64,
    revoke_all: AtomicU64,
    is_revoked: AtomicU64,
    housekeeping: AtomicU64,
}

impl FaultCounters {
    fn record(&self, op: Operation) {
        let counter = match op {
            Operation::Deny => &self.deny,
            Operation::IsDenied => &self.is_denied,
            Operation::RevokeAll => &self.revoke_all,
            Operation::IsRevoked => &self.is_revoked,
            Operation::Housekeeping => &self.housekeeping,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> FaultCounts {
        FaultCounts {
            deny: self.deny.load(Ordering::Relaxed),
            is_denied: self.is_denied.load(Ordering::Relaxed),
            revoke_all: self.revoke_all.load(Ordering::Relaxed),
            is_revoked: self.is_revoked.load(Ordering::Relaxed),
            housekeeping: self.housekeeping.load(Ordering::Relaxed),
        }
    }
}

/// Faults observed per operation since startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FaultCounts {
    pub deny: u64,
    pub is_denied: u64,
    pub revoke_all: u64,
    pub is_revoked: u64,
    pub housekeeping: u64,
}

impl FaultCounts {
    pub fn total(&self) -> u64 {
        self.deny + self.is_denied + self.revoke_all + self.is_revoked + self.housekeeping
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub denied_tokens: usize,
    pub revocation_marks: usize,
    pub faults: FaultCounts,
}

pub struct RevocationRegistry {
    store: Arc<dyn RevocationStore>,
    clock: Arc<dyn Clock>,
    faults: FaultCounters,
}

impl Default for RevocationRegistry {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl fmt::Debug for RevocationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevocationRegistry")
            .field("faults", &self.faults.snapshot())
            .finish_non_exhaustive()
    }
}

impl RevocationRegistry {
    pub fn new(store: Arc<dyn RevocationStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            faults: FaultCounters::default(),
        }
    }

    /// Process-local registry on the system clock.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), Arc::new(SystemClock))
    }

    /// Reject `token_id` for the next `ttl_seconds` seconds.
    ///
    /// Pass the token's remaining lifetime so the entry expires together with
    /// the token. Re-denying overwrites the previous expiry.
    pub fn deny(&self, token_id: &str, ttl_seconds: u64) {
        self.guarded(Operation::Deny, (), || {
            let now = self.clock.now_millis()?;
            let expires_at = i64::try_from(ttl_seconds)
                .ok()
                .and_then(|secs| secs.checked_mul(1000))
                .and_then(|ttl_millis| now.checked_add(ttl_millis))
                .ok_or(RegistryError::ExpiryOverflow(ttl_seconds))?;

            self.store.deny(token_id, expires_at)?;
            tracing::debug!(ttl_seconds, expires_at, "Token denied");
            Ok(())
        })
    }

    /// Whether `token_id` is currently denied. Expired entries found here are
    /// evicted.
    pub fn is_denied(&self, token_id: &str) -> bool {
        self.guarded(Operation::IsDenied, false, || {
            let now = self.clock.now_millis()?;
            self.store.is_denied(token_id, now)
        })
    }

    /// Invalidate every token of `principal_id` issued before now.
    pub fn revoke_all(&self, principal_id: &str) {
        self.guarded(Operation::RevokeAll, (), || {
            let now = self.clock.now_millis()?;
            self.store.revoke_all(principal_id, now)?;
            tracing::info!(principal_id, revoked_before = now, "All tokens revoked for principal");
            Ok(())
        })
    }

    /// Whether a token of `principal_id` issued at `issued_at_millis` (wall
    /// clock, epoch ms) falls before the principal's revocation mark.
    pub fn is_revoked(&self, principal_id: &str, issued_at_millis: i64) -> bool {
        self.guarded(Operation::IsRevoked, false, || {
            self.store.is_revoked(principal_id, issued_at_millis)
        })
    }

    /// Denylist entry count. Diagnostic only.
    pub fn size(&self) -> usize {
        self.guarded(Operation::Housekeeping, 0, || self.store.denied_count())
    }

    /// Drop every expired denylist entry. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.guarded(Operation::Housekeeping, 0, || {
            let now = self.clock.now_millis()?;
            self.store.sweep_expired(now)
        })
    }

    /// Drop every revocation mark set before `cutoff_millis`.
    ///
    /// Only safe when `cutoff_millis` is at least one maximum token lifetime
    /// in the past; otherwise live tokens issued before a dropped mark come
    /// back to life.
    pub fn prune_marks(&self, cutoff_millis: i64) -> usize {
        self.guarded(Operation::Housekeeping, 0, || self.store.prune_marks(cutoff_millis))
    }

    /// Drop every revocation mark older than `age`.
    pub fn prune_marks_older_than(&self, age: Duration) -> usize {
        self.guarded(Operation::Housekeeping, 0, || {
            let now = self.clock.now_millis()?;
            let age_millis = i64::try_from(age.as_millis()).unwrap_or(i64::MAX);
            self.store.prune_marks(now.saturating_sub(age_millis))
        })
    }

    pub fn stats(&self) -> RegistryStats {
        let denied_tokens = self.size();
        let revocation_marks =
            self.guarded(Operation::Housekeeping, 0, || self.store.mark_count());

        RegistryStats {
            denied_tokens,
            revocation_marks,
            faults: self.faults.snapshot(),
        }
    }

    /// Run `f`, turning an `Err` or a panic into `fallback` plus a logged,
    /// counted fault.
    fn guarded<T, F>(&self, op: Operation, fallback: T, f: F) -> T
    where
        F: FnOnce() -> Result<T, RegistryError>,
    {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                self.faults.record(op);
                tracing::error!(operation = %op, error = %e, "Revocation registry fault, degrading");
                fallback
            }
            Err(panic) => {
                self.faults.record(op);
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(operation = %op, error = %message, "Revocation registry panicked, degrading");
                fallback
            }
        }
    }
}

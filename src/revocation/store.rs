/// Revocation storage backends.
///
/// `RevocationStore` is the seam between the registry and whatever holds the
/// denylist and the principal marks. The registry owns the clock and the
/// failure policy; a store only keeps state and reports faults as `Err`.
/// `InMemoryStore` is the process-local backing. A shared key-value store can
/// implement the same trait when revocations must be visible across instances.

use dashmap::DashMap;

use crate::error::RegistryError;

pub trait RevocationStore: Send + Sync {
    /// Insert or overwrite the expiry (epoch ms) of a denied token.
    fn deny(&self, token_id: &str, expires_at_millis: i64) -> Result<(), RegistryError>;

    /// Whether `token_id` is denied at `now_millis`. An entry whose expiry is
    /// at or before `now_millis` reads as absent and is evicted.
    fn is_denied(&self, token_id: &str, now_millis: i64) -> Result<bool, RegistryError>;

    /// Record a bulk revocation for `principal_id` at `at_millis`.
    fn revoke_all(&self, principal_id: &str, at_millis: i64) -> Result<(), RegistryError>;

    /// Whether a token issued at `issued_at_millis` predates the principal's mark.
    fn is_revoked(&self, principal_id: &str, issued_at_millis: i64)
        -> Result<bool, RegistryError>;

    /// Denylist entries currently held, expired-but-unobserved ones included.
    fn denied_count(&self) -> Result<usize, RegistryError>;

    fn mark_count(&self) -> Result<usize, RegistryError>;

    /// Remove every denylist entry expired at `now_millis`. Returns how many went.
    fn sweep_expired(&self, now_millis: i64) -> Result<usize, RegistryError>;

    /// Remove every mark strictly older than `cutoff_millis`. Returns how many went.
    fn prune_marks(&self, cutoff_millis: i64) -> Result<usize, RegistryError>;
}

/// Process-local store backed by two sharded concurrent maps.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// token id -> expiry (epoch ms)
    denylist: DashMap<String, i64>,
    /// principal id -> revocation instant (epoch ms)
    marks: DashMap<String, i64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RevocationStore for InMemoryStore {
    fn deny(&self, token_id: &str, expires_at_millis: i64) -> Result<(), RegistryError> {
        self.denylist.insert(token_id.to_string(), expires_at_millis);
        Ok(())
    }

    fn is_denied(&self, token_id: &str, now_millis: i64) -> Result<bool, RegistryError> {
        // The read guard must be released before `remove_if` locks the same shard.
        let expiry = match self.denylist.get(token_id) {
            Some(entry) => *entry.value(),
            None => return Ok(false),
        };

        if now_millis < expiry {
            return Ok(true);
        }

        // Re-check under the write lock so a concurrent re-deny survives.
        self.denylist
            .remove_if(token_id, |_, expiry| now_millis >= *expiry);
        Ok(false)
    }

    fn revoke_all(&self, principal_id: &str, at_millis: i64) -> Result<(), RegistryError> {
        self.marks
            .entry(principal_id.to_string())
            .and_modify(|mark| *mark = (*mark).max(at_millis))
            .or_insert(at_millis);
        Ok(())
    }

    fn is_revoked(
        &self,
        principal_id: &str,
        issued_at_millis: i64,
    ) -> Result<bool, RegistryError> {
        Ok(self
            .marks
            .get(principal_id)
            .is_some_and(|mark| issued_at_millis < *mark.value()))
    }

    fn denied_count(&self) -> Result<usize, RegistryError> {
        Ok(self.denylist.len())
    }

    fn mark_count(&self) -> Result<usize, RegistryError> {
        Ok(self.marks.len())
    }

    fn sweep_expired(&self, now_millis: i64) -> Result<usize, RegistryError> {
        let before = self.denylist.len();
        self.denylist.retain(|_, expiry| now_millis < *expiry);
        Ok(before.saturating_sub(self.denylist.len()))
    }

    fn prune_marks(&self, cutoff_millis: i64) -> Result<usize, RegistryError> {
        let before = self.marks.len();
        self.marks.retain(|_, mark| *mark >= cutoff_millis);
        Ok(before.saturating_sub(self.marks.len()))
    }
}

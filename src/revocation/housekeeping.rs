/// Optional background sweep.
///
/// Lazy eviction alone leaves expired entries in place until someone looks
/// them up. The sweeper bounds that residue, and prunes principal marks once
/// they are older than the configured retention.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::registry::RevocationRegistry;
use crate::configuration::RevocationSettings;

/// Spawn the sweep loop on the current tokio runtime.
///
/// Returns `None` when `sweep_interval_seconds` is zero.
pub fn spawn_sweeper(
    registry: Arc<RevocationRegistry>,
    settings: &RevocationSettings,
) -> Option<JoinHandle<()>> {
    let interval = settings.sweep_interval()?;
    let mark_retention = settings.mark_retention();

    tracing::info!(
        interval_secs = interval.as_secs(),
        mark_retention_secs = mark_retention.map(|r| r.as_secs()),
        "Starting revocation sweeper"
    );

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_once(&registry, mark_retention);
        }
    }))
}

fn run_once(registry: &RevocationRegistry, mark_retention: Option<Duration>) {
    let swept = registry.sweep_expired();
    let pruned = mark_retention
        .map(|retention| registry.prune_marks_older_than(retention))
        .unwrap_or(0);

    if swept > 0 || pruned > 0 {
        tracing::debug!(swept, pruned, remaining = registry.size(), "Revocation sweep finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revocation::{InMemoryStore, ManualClock};

    fn settings(sweep_interval_seconds: u64, mark_retention_seconds: u64) -> RevocationSettings {
        RevocationSettings {
            sweep_interval_seconds,
            mark_retention_seconds,
        }
    }

    #[test]
    fn test_disabled_sweeper_is_not_spawned() {
        let registry = Arc::new(RevocationRegistry::in_memory());
        assert!(spawn_sweeper(registry, &settings(0, 0)).is_none());
    }

    #[test]
    fn test_run_once_sweeps_and_prunes() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = RevocationRegistry::new(Arc::new(InMemoryStore::new()), clock.clone());
        registry.deny("tok", 1);
        registry.revoke_all("user");
        clock.set(3_600_000);

        run_once(&registry, None);
        assert_eq!(registry.size(), 0);
        assert_eq!(registry.stats().revocation_marks, 1);

        run_once(&registry, Some(Duration::from_secs(60)));
        assert_eq!(registry.stats().revocation_marks, 0);
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries_in_background() {
        let clock = Arc::new(ManualClock::new(0));
        let registry = Arc::new(RevocationRegistry::new(
            Arc::new(InMemoryStore::new()),
            clock.clone(),
        ));
        registry.deny("tok", 1);
        clock.set(2_000);

        let handle = spawn_sweeper(registry.clone(), &settings(1, 0)).expect("sweeper enabled");
        tokio::time::sleep(Duration::from_millis(1_300)).await;
        handle.abort();

        assert_eq!(registry.size(), 0);
    }
}

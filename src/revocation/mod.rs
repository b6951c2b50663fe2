/// Token revocation module
///
/// Process-local denylist of individually revoked tokens plus per-principal
/// "revoked before" marks, behind a fail-open registry facade.

mod clock;
mod housekeeping;
mod registry;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use housekeeping::spawn_sweeper;
pub use registry::{FaultCounts, Operation, RegistryStats, RevocationRegistry};
pub use store::{InMemoryStore, RevocationStore};

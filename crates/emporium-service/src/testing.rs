//! Helpers for tests of code built on the cache-aside services.

use std::time::Duration;
use tokio::time::Instant;

pub use crate::cache::{InMemoryCache, UnavailableCache};
pub use emporium_repository::memory::InMemoryStore;

/// How long [`eventually`] waits before giving up.
pub const CONVERGENCE_DEADLINE: Duration = Duration::from_secs(2);

/// Polls `condition` until it holds or the deadline passes.
///
/// Background cache maintenance has no completion signal, so tests wait for
/// its effect instead.
pub async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + CONVERGENCE_DEADLINE;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

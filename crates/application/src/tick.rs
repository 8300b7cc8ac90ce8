//! Re-entrancy protection for scheduled ticks.

use tokio::sync::{Mutex, MutexGuard};

/// Prevents overlapping executions of the same tick.
///
/// The external scheduler re-invokes each tick on a fixed cadence with no
/// knowledge of whether the previous invocation finished. A tick that cannot
/// acquire its guard skips the invocation instead of running re-entrantly,
/// which would risk double-dispatching an order or double-moving a courier.
#[derive(Debug, Default)]
pub struct TickGuard {
    lock: Mutex<()>,
}

impl TickGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a permit for this invocation, or `None` if the previous
    /// invocation is still running.
    pub fn try_acquire(&self) -> Option<MutexGuard<'_, ()>> {
        self.lock.try_lock().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_permit_held() {
        let guard = TickGuard::new();
        let permit = guard.try_acquire();
        assert!(permit.is_some());
        assert!(guard.try_acquire().is_none());

        drop(permit);
        assert!(guard.try_acquire().is_some());
    }
}

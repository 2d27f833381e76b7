//! Per-athlete write serialization

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Keyed async locks, one per athlete.
///
/// Pass mutation and result upsert for an athlete happen while holding its guard,
/// so two passes for the same athlete cannot interleave their evaluations.
#[derive(Default)]
pub struct AthleteLocks {
    slots: Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>,
}

impl AthleteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to an athlete
    pub async fn acquire(&self, athlete_id: i64) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Drop slots nobody holds or waits on
            if slots.len() > 4096 {
                slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            }
            slots.entry(athlete_id).or_default().clone()
        };

        slot.lock_owned().await
    }
}

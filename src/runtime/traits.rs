/*!
 * Scheduler Seam
 * Interface through which the dispatcher hands decisions to the scheduler
 */

use crate::core::mask::Mask;
use crate::core::sync::{SyncConfig, SyncEvent};
use crate::core::types::{EvFlagId, SsId};

/// Resume mechanism for state sets
///
/// The dispatcher only decides *who* to wake; implementations decide what
/// waking means. Both methods are called while an event flag's lock is held
/// and must not block or call back into the program.
pub trait Scheduler: Send + Sync {
    /// Wake a state set that may be waiting on an event it is interested in
    fn wake(&self, ss: SsId);

    /// Refresh the state set's buffered copies of the channels synced to a
    /// flag that just tested true (safe mode only)
    fn read_buffer_selective(&self, ss: SsId, ef: EvFlagId, synced: &Mask) {
        let _ = (ss, ef, synced);
    }
}

/// One binary wakeup event per state set
pub struct SyncSignals {
    events: Vec<SyncEvent>,
}

impl SyncSignals {
    pub fn new(num_state_sets: usize, config: SyncConfig) -> Self {
        Self {
            events: (0..num_state_sets)
                .map(|_| SyncEvent::new(config.clone()))
                .collect(),
        }
    }

    /// Wakeup event of a state set, for its task to wait on
    pub fn event(&self, ss: SsId) -> &SyncEvent {
        &self.events[ss.index()]
    }
}

impl Scheduler for SyncSignals {
    fn wake(&self, ss: SsId) {
        self.events[ss.index()].signal();
    }
}

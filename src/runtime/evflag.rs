/*!
 * Event Flag Control Blocks
 */

use crate::core::errors::{RegistryError, RegistryResult};
use crate::core::mask::{nwords, Mask};
use parking_lot::{Mutex, MutexGuard};

/// State guarded by an event flag's lock
#[derive(Debug)]
pub struct EvFlagState {
    pub value: bool,
    /// Channels currently synced to this flag, one bit per channel index
    pub synced: Mask,
}

/// One event flag of a program instance
#[derive(Debug)]
pub struct EventFlag {
    name: String,
    state: Mutex<EvFlagState>,
}

impl EventFlag {
    /// Create a flag with an empty synced-channel set sized for `num_channels`
    pub(crate) fn create(name: &str, initial: bool, num_channels: usize) -> RegistryResult<Self> {
        let mut words = Vec::new();
        words
            .try_reserve_exact(nwords(num_channels))
            .map_err(|_| RegistryError::AllocationFailed(format!("synced set of flag {}", name)))?;
        words.resize(nwords(num_channels), 0);

        Ok(Self {
            name: name.to_string(),
            state: Mutex::new(EvFlagState {
                value: initial,
                synced: Mask::from_words(words),
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquire the flag's lock
    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, EvFlagState> {
        self.state.lock()
    }

    /// Current value, read under the lock
    pub fn value(&self) -> bool {
        self.state.lock().value
    }

    /// Snapshot of the synced-channel set, read under the lock
    pub fn synced(&self) -> Mask {
        self.state.lock().synced.clone()
    }
}

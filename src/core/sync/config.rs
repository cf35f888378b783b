/*!
 * Wakeup Event Configuration
 *
 * How a state set waiting on its wakeup event parks
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Waiting strategy of a `SyncEvent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyType {
    /// Park on the condvar straight away
    Condvar,
    /// Poll the pending hint for a bounded time, then park
    SpinWait,
}

/// Wakeup event configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub strategy: StrategyType,
    /// Upper bound on time spent polling before parking
    pub spin_duration: Duration,
    /// Upper bound on poll iterations before parking
    pub max_spins: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyType::Condvar,
            spin_duration: Duration::from_micros(10),
            max_spins: 100,
        }
    }
}

impl SyncConfig {
    /// Poll briefly before parking, for state sets woken within microseconds
    pub const fn low_latency() -> Self {
        Self {
            strategy: StrategyType::SpinWait,
            spin_duration: Duration::from_micros(50),
            max_spins: 500,
        }
    }
}

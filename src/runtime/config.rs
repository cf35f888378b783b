/*!
 * Instance Configuration
 *
 * Per-instance knobs for registry construction
 */

use crate::core::limits::DEFAULT_PV_NAME_BUFFER;
use crate::core::sync::SyncConfig;
use serde::{Deserialize, Serialize};

/// Program instance configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceConfig {
    /// Buffer size for evaluated channel names, terminator included
    pub pv_name_buffer: usize,
    /// Wait strategy of the state set wakeup events
    pub wakeup: SyncConfig,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            pv_name_buffer: DEFAULT_PV_NAME_BUFFER,
            wakeup: SyncConfig::default(),
        }
    }
}

impl InstanceConfig {
    /// Configuration for state sets that expect to be woken within microseconds
    pub const fn low_latency() -> Self {
        Self {
            pv_name_buffer: DEFAULT_PV_NAME_BUFFER,
            wakeup: SyncConfig::low_latency(),
        }
    }

    /// Longest channel name kept after evaluation
    pub fn max_pv_name_len(&self) -> usize {
        self.pv_name_buffer.saturating_sub(1)
    }
}

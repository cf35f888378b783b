/*!
 * Channel Control Blocks
 */

use super::queue::SeqQueue;
use crate::core::pv_type::PvTypeInfo;
use crate::core::types::{EvFlagId, EventNumber, MaskIndex};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// Binding of a channel to an external data point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbChannel {
    pub db_name: String,
    /// At least one state set monitors this channel
    pub monitored: bool,
}

/// State guarded by a channel's lock
#[derive(Debug, Default)]
pub struct ChannelState {
    pub synced_to: Option<EvFlagId>,
}

/// One channel of a program instance
#[derive(Debug)]
pub struct Channel {
    pub(crate) var_name: String,
    pub(crate) offset: usize,
    pub(crate) count: usize,
    pub(crate) event_num: EventNumber,
    pub(crate) type_info: &'static PvTypeInfo,
    pub(crate) mon_mask: MaskIndex,
    pub(crate) db: Option<DbChannel>,
    pub(crate) queue: Option<Arc<SeqQueue>>,
    pub(crate) state: Mutex<ChannelState>,
}

impl Channel {
    pub fn var_name(&self) -> &str {
        &self.var_name
    }

    /// Offset of the channel's variable in program storage
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn event_number(&self) -> EventNumber {
        self.event_num
    }

    pub fn type_info(&self) -> &'static PvTypeInfo {
        self.type_info
    }

    /// Index of the generated monitor mask, shared by all instances
    pub fn monitor_mask_index(&self) -> MaskIndex {
        self.mon_mask
    }

    /// External name binding; `None` for anonymous channels
    pub fn db(&self) -> Option<&DbChannel> {
        self.db.as_ref()
    }

    pub fn queue(&self) -> Option<&Arc<SeqQueue>> {
        self.queue.as_ref()
    }

    /// Flag this channel is currently synced to
    pub fn synced_to(&self) -> Option<EvFlagId> {
        self.state.lock().synced_to
    }

    /// Acquire the channel's lock
    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, ChannelState> {
        self.state.lock()
    }
}

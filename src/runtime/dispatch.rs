/*!
 * Wakeup Dispatcher
 * Event flag operations, channel sync and state set wakeup
 *
 * # Locking
 *
 * - Each event flag lock guards the flag's value and synced-channel set
 * - A flag set or clear dispatches its wakeup before releasing the flag's
 *   lock, so a woken state set re-reading the flag sees the new value
 * - Lock order is channel, then flag, then state set; nothing is ever
 *   acquired in the opposite direction
 * - `pv_sync` holds the channel's lock for the whole transition and takes
 *   the old and new flag locks one after the other inside it; no two flag
 *   locks are ever held together
 */

use super::program::Program;
use crate::core::types::{ChanId, EvFlagId, EventNumber, SsId};
use tracing::{debug, trace};

impl Program {
    /// Set a flag and wake every state set interested in it
    pub fn ef_set(&self, ef: EvFlagId) {
        let flag = self.event_flag(ef);
        let mut state = flag.lock();
        state.value = true;
        self.wakeup(ef.event_number());
        drop(state);
    }

    /// Clear a flag and wake every state set interested in it
    ///
    /// Returns whether the flag was set before.
    pub fn ef_clear(&self, ef: EvFlagId) -> bool {
        let flag = self.event_flag(ef);
        let mut state = flag.lock();
        let was_set = state.value;
        state.value = false;
        self.wakeup(ef.event_number());
        drop(state);
        was_set
    }

    /// Test a flag on behalf of a state set
    ///
    /// In safe mode a set flag refreshes the caller's copies of the synced
    /// channels. During condition evaluation the flag is recorded in the
    /// caller's event mask.
    pub fn ef_test(&self, ss: SsId, ef: EvFlagId) -> bool {
        let flag = self.event_flag(ef);
        let state_set = self.state_set(ss);
        let state = flag.lock();
        let is_set = state.value;
        if is_set && self.is_safe() {
            self.scheduler.read_buffer_selective(ss, ef, &state.synced);
        }
        state_set.record(ef.event_number());
        drop(state);
        is_set
    }

    /// Test and clear a flag in one lock hold
    ///
    /// Behaves like `ef_test`, additionally clearing the flag. No wakeup is
    /// dispatched for the clear.
    pub fn ef_test_and_clear(&self, ss: SsId, ef: EvFlagId) -> bool {
        let flag = self.event_flag(ef);
        let state_set = self.state_set(ss);
        let mut state = flag.lock();
        let is_set = state.value;
        state.value = false;
        if is_set && self.is_safe() {
            self.scheduler.read_buffer_selective(ss, ef, &state.synced);
        }
        state_set.record(ef.event_number());
        drop(state);
        is_set
    }

    /// Sync a channel to a flag, or unsync it with `None`
    pub fn pv_sync(&self, chan: ChanId, new_ef: Option<EvFlagId>) {
        self.pv_array_sync(&[chan], new_ef);
    }

    /// Sync every channel in `chans` to the same flag, or unsync them
    pub fn pv_array_sync(&self, chans: &[ChanId], new_ef: Option<EvFlagId>) {
        if let Some(ef) = new_ef {
            // Range check before touching any channel
            self.event_flag(ef);
        }

        for &chan in chans {
            let channel = self.channel(chan);
            let mut state = channel.lock();
            let old_ef = state.synced_to;
            if old_ef == new_ef {
                continue;
            }

            if let Some(old) = old_ef {
                self.event_flag(old).lock().synced.clear(chan.index());
            }
            if let Some(new) = new_ef {
                self.event_flag(new).lock().synced.set(chan.index());
            }
            state.synced_to = new_ef;
            drop(state);

            debug!(
                var = %channel.var_name(),
                from = old_ef.map(|ef| ef.get()),
                to = new_ef.map(|ef| ef.get()),
                "channel sync changed"
            );
        }
    }

    /// Storage offset of a channel's variable
    ///
    /// During condition evaluation the access is recorded in the caller's
    /// event mask.
    pub fn pv_offset(&self, ss: Option<SsId>, chan: ChanId) -> usize {
        let channel = self.channel(chan);
        if let Some(ss) = ss {
            self.state_set(ss).record(channel.event_number());
        }
        channel.offset()
    }

    /// A monitored channel delivered a new value
    ///
    /// A synced channel sets its flag first; then every state set interested
    /// in the channel itself is woken.
    pub fn channel_event(&self, chan: ChanId) {
        let channel = self.channel(chan);
        if let Some(ef) = channel.synced_to() {
            self.ef_set(ef);
        }
        self.wakeup(channel.event_number());
    }

    /// Wake every state set whose event mask covers `event`
    ///
    /// Returns the number of state sets signaled.
    pub fn wakeup(&self, event: EventNumber) -> usize {
        debug_assert!(
            event.0 > 0 && event.bit() <= self.tables.max_event_number(),
            "event number {} out of range",
            event
        );

        let mut woken = 0;
        for ss in &self.state_sets {
            if ss.is_interested(event) {
                self.scheduler.wake(ss.id());
                woken += 1;
            }
        }
        trace!(event = event.0, woken, "wakeup dispatched");
        woken
    }
}

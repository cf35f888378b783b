/*!
 * State Set Control Blocks
 *
 * A state set's event mask is its interest mask: the scheduler clears it
 * before evaluating the current state's conditions, every flag test and
 * channel access made during evaluation records its event number, and the
 * recorded mask decides which later events wake the state set.
 */

use crate::core::mask::Mask;
use crate::core::types::{ChanId, EventNumber, SsId};
use parking_lot::Mutex;

/// State guarded by a state set's lock
#[derive(Debug)]
pub struct EvalState {
    /// Condition evaluation in progress; accesses are being recorded
    pub eval_when: bool,
    /// Events this state set is interested in
    pub mask: Mask,
}

/// One state set of a program instance
#[derive(Debug)]
pub struct StateSet {
    id: SsId,
    name: String,
    num_states: usize,
    /// Monitored bit per channel, fixed once the instance is built
    pub(crate) monitored: Vec<bool>,
    eval: Mutex<EvalState>,
}

impl StateSet {
    pub(crate) fn new(
        id: SsId,
        name: &str,
        num_states: usize,
        num_channels: usize,
        max_event_number: usize,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            num_states,
            monitored: vec![false; num_channels],
            eval: Mutex::new(EvalState {
                eval_when: false,
                mask: Mask::with_max_bit(max_event_number),
            }),
        }
    }

    pub fn id(&self) -> SsId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    /// Whether this state set monitors the channel
    pub fn monitors(&self, chan: ChanId) -> bool {
        self.monitored[chan.index()]
    }

    /// Start recording: clear the event mask and enable recording
    pub fn begin_when_eval(&self) {
        let mut eval = self.eval.lock();
        eval.mask.clear_all();
        eval.eval_when = true;
    }

    /// Stop recording; the recorded mask stays as the interest mask
    pub fn end_when_eval(&self) {
        self.eval.lock().eval_when = false;
    }

    pub fn is_evaluating(&self) -> bool {
        self.eval.lock().eval_when
    }

    /// Snapshot of the interest mask
    pub fn event_mask(&self) -> Mask {
        self.eval.lock().mask.clone()
    }

    /// Whether an event on `event` should wake this state set
    pub fn is_interested(&self, event: EventNumber) -> bool {
        self.eval.lock().mask.test(event.bit())
    }

    /// Record an event number if evaluation is in progress
    pub(crate) fn record(&self, event: EventNumber) {
        let mut eval = self.eval.lock();
        if eval.eval_when {
            eval.mask.set(event.bit());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_window() {
        let ss = StateSet::new(SsId(0), "ss", 1, 2, 5);

        // Outside evaluation nothing is recorded
        ss.record(EventNumber(2));
        assert!(ss.event_mask().is_empty());

        ss.begin_when_eval();
        ss.record(EventNumber(2));
        ss.record(EventNumber(5));
        ss.end_when_eval();
        ss.record(EventNumber(3));

        assert!(ss.is_interested(EventNumber(2)));
        assert!(ss.is_interested(EventNumber(5)));
        assert!(!ss.is_interested(EventNumber(3)));
    }

    #[test]
    fn test_begin_clears_previous_mask() {
        let ss = StateSet::new(SsId(0), "ss", 1, 0, 3);
        ss.begin_when_eval();
        ss.record(EventNumber(1));
        ss.end_when_eval();

        ss.begin_when_eval();
        assert!(ss.event_mask().is_empty());
        assert!(ss.is_evaluating());
    }
}

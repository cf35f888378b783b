/*!
 * Core Types
 * Typed indices shared by the table generator and the runtime registry
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Event flag number (1-based, `1..=num_event_flags`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvFlagId(u32);

impl EvFlagId {
    /// Create a flag id; `0` is not a valid flag number
    pub fn new(num: u32) -> Self {
        assert!(num > 0, "event flag numbers start at 1");
        Self(num)
    }

    #[inline(always)]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Position in a 0-based control block array
    #[inline(always)]
    pub fn slot(self) -> usize {
        self.0 as usize - 1
    }

    /// Flags occupy the low end of the event number space
    #[inline(always)]
    pub fn event_number(self) -> EventNumber {
        EventNumber(self.0)
    }
}

/// Channel index (0-based, `0..num_channels`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChanId(pub u32);

impl ChanId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Channels follow the flags in the event number space
    #[inline(always)]
    pub fn event_number(self, num_event_flags: usize) -> EventNumber {
        EventNumber(num_event_flags as u32 + self.0 + 1)
    }
}

/// State set index (0-based, `0..num_state_sets`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SsId(pub u32);

impl SsId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Unified coordinate over flags and channels; `0` is never assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventNumber(pub u32);

impl EventNumber {
    #[inline(always)]
    pub fn bit(self) -> usize {
        self.0 as usize
    }

    /// Largest event number of a program, which sizes every event mask
    pub fn max_for(num_event_flags: usize, num_channels: usize) -> usize {
        num_event_flags + num_channels
    }
}

/// Index into the generated monitor mask list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskIndex(pub u32);

impl MaskIndex {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Shared queue slot index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueIndex(pub u32);

impl QueueIndex {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EvFlagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ef#{}", self.0)
    }
}

impl fmt::Display for ChanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch#{}", self.0)
    }
}

impl fmt::Display for SsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ss#{}", self.0)
    }
}

impl fmt::Display for EventNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ev#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_numbering() {
        // 2 flags, 3 channels: flags 1..=2, channels 3..=5
        assert_eq!(EvFlagId::new(1).event_number(), EventNumber(1));
        assert_eq!(EvFlagId::new(2).event_number(), EventNumber(2));
        assert_eq!(ChanId(0).event_number(2), EventNumber(3));
        assert_eq!(ChanId(2).event_number(2), EventNumber(5));
        assert_eq!(EventNumber::max_for(2, 3), 5);
    }

    #[test]
    fn test_flag_slot() {
        assert_eq!(EvFlagId::new(1).slot(), 0);
        assert_eq!(EvFlagId::new(7).slot(), 6);
    }

    #[test]
    #[should_panic]
    fn test_flag_zero_rejected() {
        EvFlagId::new(0);
    }
}

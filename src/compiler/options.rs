/*!
 * Option Encodings
 * Program and state option bits shared by generated tables and the runtime
 */

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Encoded program options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ProgramOptionBits: u32 {
        const DEBUG = 1 << 0;
        const ASYNC = 1 << 1;
        const CONN = 1 << 2;
        const REENT = 1 << 3;
        const SAFE = 1 << 6;
    }
}

bitflags! {
    /// Encoded state options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StateOptionBits: u32 {
        const NORESETTIMERS = 1 << 0;
        const DOENTRYFROMSELF = 1 << 1;
        const DOEXITTOSELF = 1 << 2;
    }
}

/// Program options as resolved by the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramOptions {
    #[serde(rename = "async")]
    pub async_get: bool,
    pub conn: bool,
    pub debug: bool,
    pub reent: bool,
    pub safe: bool,
}

impl ProgramOptions {
    pub fn encode(&self) -> ProgramOptionBits {
        let mut bits = ProgramOptionBits::empty();
        bits.set(ProgramOptionBits::ASYNC, self.async_get);
        bits.set(ProgramOptionBits::CONN, self.conn);
        bits.set(ProgramOptionBits::DEBUG, self.debug);
        bits.set(ProgramOptionBits::REENT, self.reent);
        bits.set(ProgramOptionBits::SAFE, self.safe);
        bits
    }
}

/// State options as resolved by the front end
///
/// The front end stores the negated form; the encoding flips each one back so
/// that a default state carries no option bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateOptions {
    pub do_reset_timers: bool,
    pub no_entry_from_self: bool,
    pub no_exit_to_self: bool,
}

impl Default for StateOptions {
    fn default() -> Self {
        Self {
            do_reset_timers: true,
            no_entry_from_self: true,
            no_exit_to_self: true,
        }
    }
}

impl StateOptions {
    pub fn encode(&self) -> StateOptionBits {
        let mut bits = StateOptionBits::empty();
        bits.set(StateOptionBits::NORESETTIMERS, !self.do_reset_timers);
        bits.set(StateOptionBits::DOENTRYFROMSELF, !self.no_entry_from_self);
        bits.set(StateOptionBits::DOEXITTOSELF, !self.no_exit_to_self);
        bits
    }
}

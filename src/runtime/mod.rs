/*!
 * Runtime Module
 * Per-instance registry and wakeup dispatch
 *
 * A `Program` is built from shared `ProgramTables`. It owns the event flag,
 * channel and state set control blocks of one running instance and decides
 * which state sets to wake when a flag or channel changes. Running the woken
 * state sets is left to a `Scheduler` implementation.
 */

mod channel;
mod config;
mod dispatch;
mod evflag;
mod macros;
mod program;
mod queue;
mod state_set;
pub mod traits;

// Re-export public API
pub use channel::{Channel, ChannelState, DbChannel};
pub use config::InstanceConfig;
pub use evflag::{EvFlagState, EventFlag};
pub use macros::{MacroEvaluator, MacroTable, NoMacros};
pub use program::Program;
pub use queue::{QueueSlots, SeqQueue};
pub use state_set::{EvalState, StateSet};
pub use traits::{Scheduler, SyncSignals};

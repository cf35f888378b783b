/*!
 * Sequencer Core Library
 * Compile-time monitor tables and run-time event synchronization for
 * state-machine programs driven by external channels
 */

pub mod compiler;
pub mod core;
pub mod monitoring;
pub mod runtime;

// Re-exports
pub use crate::core::errors::*;
pub use crate::core::types::{ChanId, EvFlagId, EventNumber, MaskIndex, QueueIndex, SsId};
pub use compiler::{render_c, ProgramGraph, ProgramTables};
pub use monitoring::init_tracing;
pub use runtime::{InstanceConfig, MacroEvaluator, Program, Scheduler, SyncSignals};

/*!
 * Compiler Module
 * Compile-time table generation for sequencer programs
 *
 * The front end resolves a program into a `ProgramGraph`; this module
 * deduplicates monitor masks and produces the static `ProgramTables` every
 * runtime instance is built from.
 */

pub mod emit;
pub mod graph;
pub mod options;
pub mod pool;
pub mod tables;

// Re-export public API
pub use emit::{render_c, write_c};
pub use graph::{
    ChanDecl, EvFlagDecl, MonitorScope, ProgramGraph, QueueDecl, StateDecl, StateSetDecl,
};
pub use options::{ProgramOptionBits, ProgramOptions, StateOptionBits, StateOptions};
pub use pool::MonitorMaskPool;
pub use tables::{
    ChanEntry, EvFlagEntry, ProgramDescriptor, ProgramTables, StateEntry, StateSetEntry,
    StateTable,
};

/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::{ChanId, QueueIndex, SsId};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for program instance construction
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type for program graph validation
pub type GraphResult<T> = Result<T, GraphError>;

/// Fatal program instance construction errors
///
/// These indicate static misconfiguration, not transient faults: the instance
/// is abandoned and construction is never retried.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum RegistryError {
    #[error("Allocation failed: {0}")]
    #[diagnostic(
        code(registry::allocation_failed),
        help("The system is out of memory. The program instance cannot be started.")
    )]
    AllocationFailed(String),

    #[error("Queue {index:?} creation failed (capacity {capacity}, element size {elem_size})")]
    #[diagnostic(
        code(registry::queue_create_failed),
        help("Queue capacity and element size must both be non-zero.")
    )]
    QueueCreateFailed {
        index: QueueIndex,
        capacity: usize,
        elem_size: usize,
    },

    #[error(
        "Inconsistent shared queue definitions for {var_name}: queue {index:?} holds \
         {have_capacity} x {have_elem_size} bytes, channel wants {want_capacity} x {want_elem_size} bytes"
    )]
    #[diagnostic(
        code(registry::inconsistent_queue),
        help("All channels sharing a queue must declare the same queue size, type and element count.")
    )]
    InconsistentQueue {
        var_name: String,
        index: QueueIndex,
        have_capacity: usize,
        have_elem_size: usize,
        want_capacity: usize,
        want_elem_size: usize,
    },

    #[error("Bad program magic number {0}")]
    #[diagnostic(
        code(registry::bad_magic),
        help("The tables were generated by an incompatible table generator. Regenerate them.")
    )]
    BadMagic(u32),
}

/// Malformed program graph errors
///
/// Raised at the front-end boundary. Table generation itself assumes a graph
/// that passed validation.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum GraphError {
    #[error("Channel {chan} monitored by unknown state set {ss}")]
    #[diagnostic(code(graph::unknown_state_set))]
    UnknownStateSet { chan: ChanId, ss: SsId },

    #[error("Channel {chan} synced to unknown event flag {ef}")]
    #[diagnostic(code(graph::unknown_event_flag))]
    UnknownEventFlag { chan: ChanId, ef: u32 },

    #[error("Channel {chan} uses queue {index:?} but the program declares {num_queues} queues")]
    #[diagnostic(code(graph::unknown_queue))]
    UnknownQueue {
        chan: ChanId,
        index: QueueIndex,
        num_queues: usize,
    },

    #[error("Channel {chan} declares a queue of size 0")]
    #[diagnostic(code(graph::empty_queue))]
    EmptyQueue { chan: ChanId },

    #[error("Duplicate state set name: {0}")]
    #[diagnostic(
        code(graph::duplicate_state_set),
        help("State set names generate table symbols and must be unique within a program.")
    )]
    DuplicateStateSet(String),
}

/// Unified sequencer error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum SeqError {
    #[error("Registry error: {0}")]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error("Graph error: {0}")]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

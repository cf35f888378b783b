/*!
 * Sequencer Limits and Constants
 *
 * Centralized location for the constants shared by the table generator and
 * the runtime registry. Values the two sides must agree on live here.
 */

// =============================================================================
// PROGRAM TABLE
// =============================================================================

/// Magic number stamped into every generated program descriptor
/// Lets the runtime reject tables built by an incompatible generator
pub const PROGRAM_MAGIC: u32 = 2_001_018;

// =============================================================================
// GENERATED SYMBOL NAMES
// =============================================================================

pub const NM_EVFLAGS: &str = "seqg_evflags";
pub const NM_CHANS: &str = "seqg_chans";
pub const NM_MONMASK: &str = "seqg_mon";
pub const NM_STATES: &str = "seqg_states";
pub const NM_STATESETS: &str = "seqg_statesets";
pub const NM_TRANS: &str = "seqg_trans";
pub const NM_ENTRY: &str = "seqg_entry";
pub const NM_EXIT: &str = "seqg_exit";
pub const NM_INIT: &str = "seqg_init";
pub const NM_VARS: &str = "seqg_vars";

// =============================================================================
// RUNTIME
// =============================================================================

/// Default size of the buffer a channel name is evaluated into
/// Includes the terminator, so evaluated names keep at most 99 characters
pub const DEFAULT_PV_NAME_BUFFER: usize = 100;

/// Size of a transport string value
pub const MAX_STRING_SIZE: usize = 40;

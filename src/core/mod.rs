/*!
 * Core Module
 * Fundamental sequencer types, masks and error handling
 */

pub mod errors;
pub mod limits;
pub mod mask;
pub mod pv_type;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use mask::{bit_clear, bit_set, bit_test, nwords, Mask, SeqMask, NBITS};
pub use pv_type::{PvType, PvTypeInfo, PvTypeTag};
pub use types::*;

/*!
 * Synchronization Primitives
 *
 * Binary wakeup events for state sets:
 * - Condvar-based parking for reliability
 * - Optional adaptive spin before parking for low-latency wakeups
 *
 * # Architecture
 *
 * Each state set owns one `SyncEvent`. A signal that arrives while nobody
 * waits is latched and consumed by the next wait, so a wakeup dispatched
 * between condition evaluation and parking is never lost.
 */

mod config;
mod event;

pub use config::{StrategyType, SyncConfig};
pub use event::{SyncEvent, WaitError, WaitResult};

/*!
 * Binary Wakeup Event
 *
 * Latched signal with condvar parking, one per state set.
 */

use super::config::{StrategyType, SyncConfig};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Result type for wait operations
pub type WaitResult<T> = Result<T, WaitError>;

/// Wait operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    #[error("Wait operation timed out")]
    Timeout,
}

/// Binary event: `signal` latches, `wait` consumes
///
/// Multiple signals before a wait collapse into one wakeup.
pub struct SyncEvent {
    signaled: Mutex<bool>,
    condvar: Condvar,
    /// Lock-free hint for the spin phase
    pending: AtomicBool,
    signals: AtomicU64,
    config: SyncConfig,
}

impl SyncEvent {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            signaled: Mutex::new(false),
            condvar: Condvar::new(),
            pending: AtomicBool::new(false),
            signals: AtomicU64::new(0),
            config,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(SyncConfig::default())
    }

    /// Latch the event and wake the waiter, if any
    pub fn signal(&self) {
        self.signals.fetch_add(1, Ordering::Relaxed);
        let mut signaled = self.signaled.lock();
        *signaled = true;
        self.pending.store(true, Ordering::Release);
        self.condvar.notify_one();
    }

    /// Wait until signaled, consuming the signal
    ///
    /// Returns `Err(WaitError::Timeout)` if the timeout elapsed first.
    pub fn wait(&self, timeout: Option<Duration>) -> WaitResult<()> {
        let start = Instant::now();

        if self.config.strategy == StrategyType::SpinWait {
            self.spin(start, timeout);
        }

        let mut signaled = self.signaled.lock();
        while !*signaled {
            match timeout {
                Some(timeout) => {
                    let remaining = timeout.saturating_sub(start.elapsed());
                    if remaining.is_zero()
                        || self.condvar.wait_for(&mut signaled, remaining).timed_out()
                    {
                        if *signaled {
                            break;
                        }
                        return Err(WaitError::Timeout);
                    }
                }
                None => self.condvar.wait(&mut signaled),
            }
        }
        *signaled = false;
        self.pending.store(false, Ordering::Release);
        Ok(())
    }

    /// Consume a pending signal without blocking
    pub fn try_wait(&self) -> bool {
        let mut signaled = self.signaled.lock();
        let was = *signaled;
        *signaled = false;
        self.pending.store(false, Ordering::Release);
        was
    }

    /// Whether a signal is latched and not yet consumed
    pub fn is_signaled(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Total number of `signal` calls since creation
    pub fn signal_count(&self) -> u64 {
        self.signals.load(Ordering::Relaxed)
    }

    /// Spin until a signal is pending or the spin budget is exhausted
    fn spin(&self, start: Instant, timeout: Option<Duration>) {
        let mut spin_count = 0;
        loop {
            if self.pending.load(Ordering::Acquire) {
                return;
            }
            let elapsed = start.elapsed();
            if elapsed >= self.config.spin_duration
                || spin_count >= self.config.max_spins
                || timeout.is_some_and(|t| elapsed >= t)
            {
                return;
            }
            // Yield to scheduler occasionally
            if spin_count % 10 == 0 {
                thread::yield_now();
            }
            spin_count += 1;
        }
    }
}

impl Default for SyncEvent {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/*!
 * Channel Queues
 * Bounded message queues shared by channels through a queue index
 */

use crate::core::errors::{RegistryError, RegistryResult};
use crate::core::types::QueueIndex;
use crossbeam_queue::ArrayQueue;
use std::sync::Arc;
use tracing::error;

/// Bounded queue of fixed-size messages
///
/// When full, `put` drops the oldest message so the newest value is never
/// lost.
pub struct SeqQueue {
    elems: ArrayQueue<Box<[u8]>>,
    elem_size: usize,
}

impl SeqQueue {
    /// Create a queue of `num_elems` messages of `elem_size` bytes each
    pub fn create(num_elems: usize, elem_size: usize) -> Option<Self> {
        if num_elems == 0 || elem_size == 0 {
            return None;
        }
        Some(Self {
            elems: ArrayQueue::new(num_elems),
            elem_size,
        })
    }

    pub fn num_elems(&self) -> usize {
        self.elems.capacity()
    }

    pub fn elem_size(&self) -> usize {
        self.elem_size
    }

    pub fn used(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Append a message, truncated or zero-padded to the element size
    ///
    /// Returns `true` if the queue was full and the oldest message was dropped.
    pub fn put(&self, value: &[u8]) -> bool {
        let mut elem = vec![0u8; self.elem_size].into_boxed_slice();
        let n = value.len().min(self.elem_size);
        elem[..n].copy_from_slice(&value[..n]);
        self.elems.force_push(elem).is_some()
    }

    /// Remove the oldest message
    pub fn get(&self) -> Option<Box<[u8]>> {
        self.elems.pop()
    }

    /// Discard all messages
    pub fn flush(&self) {
        while self.elems.pop().is_some() {}
    }
}

impl std::fmt::Debug for SeqQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeqQueue")
            .field("num_elems", &self.num_elems())
            .field("elem_size", &self.elem_size)
            .field("used", &self.used())
            .finish()
    }
}

/// Queue slots of one program instance
#[derive(Debug)]
pub struct QueueSlots {
    slots: Vec<Option<Arc<SeqQueue>>>,
}

impl QueueSlots {
    pub fn new(num_queues: usize) -> Self {
        Self {
            slots: vec![None; num_queues],
        }
    }

    /// Bind a channel to a shared queue, creating it on first use
    ///
    /// A second binding must request exactly the same shape; a mismatch
    /// leaves the existing queue untouched.
    pub fn bind(
        &mut self,
        index: QueueIndex,
        num_elems: usize,
        elem_size: usize,
        var_name: &str,
    ) -> RegistryResult<Arc<SeqQueue>> {
        let slot = &mut self.slots[index.index()];
        match slot {
            None => {
                let queue = SeqQueue::create(num_elems, elem_size).ok_or_else(|| {
                    error!(queue = index.0, num_elems, elem_size, "queue creation failed");
                    RegistryError::QueueCreateFailed {
                        index,
                        capacity: num_elems,
                        elem_size,
                    }
                })?;
                let queue = Arc::new(queue);
                *slot = Some(queue.clone());
                Ok(queue)
            }
            Some(queue) => {
                if queue.num_elems() != num_elems || queue.elem_size() != elem_size {
                    error!(
                        var = var_name,
                        queue = index.0,
                        "inconsistent shared queue definitions"
                    );
                    return Err(RegistryError::InconsistentQueue {
                        var_name: var_name.to_string(),
                        index,
                        have_capacity: queue.num_elems(),
                        have_elem_size: queue.elem_size(),
                        want_capacity: num_elems,
                        want_elem_size: elem_size,
                    });
                }
                Ok(queue.clone())
            }
        }
    }

    pub fn get(&self, index: QueueIndex) -> Option<&Arc<SeqQueue>> {
        self.slots.get(index.index()).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

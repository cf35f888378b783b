/*!
 * Monitor Mask Pool
 * Deduplicates per-channel subscriber masks into a canonical indexed list
 *
 * Channels monitored by the same state sets share one generated mask. Masks
 * are interned in first-seen order, so regenerating from the same graph
 * yields the same numbering.
 */

use super::graph::{ChanDecl, MonitorScope};
use crate::core::mask::Mask;
use crate::core::types::MaskIndex;
use ahash::RandomState;
use indexmap::IndexSet;
use tracing::debug;

/// Canonical monitor masks of one program
#[derive(Debug, Clone)]
pub struct MonitorMaskPool {
    num_state_sets: usize,
    masks: IndexSet<Mask, RandomState>,
}

impl MonitorMaskPool {
    /// Create an empty pool for masks over `num_state_sets` state sets
    pub fn new(num_state_sets: usize) -> Self {
        Self {
            num_state_sets,
            masks: IndexSet::with_hasher(RandomState::new()),
        }
    }

    /// Build the pool for a channel list, returning each channel's mask index
    pub fn build(channels: &[ChanDecl], num_state_sets: usize) -> (Self, Vec<MaskIndex>) {
        let mut pool = Self::new(num_state_sets);
        let mut working = pool.empty_mask();

        let indices = channels
            .iter()
            .map(|chan| {
                pool.fill_subscribers(&mut working, &chan.monitors);
                let index = pool.intern(&working);
                debug!(
                    var = %chan.var_name,
                    mask_index = index.0,
                    mask = ?working,
                    "assigned monitor mask"
                );
                working.clear_all();
                index
            })
            .collect();

        (pool, indices)
    }

    /// An all-zero mask of the pool's width
    pub fn empty_mask(&self) -> Mask {
        Mask::with_max_bit(self.num_state_sets)
    }

    /// Set the bit of every state set named by the monitor declarations
    pub fn fill_subscribers(&self, mask: &mut Mask, monitors: &[MonitorScope]) {
        for scope in monitors {
            match *scope {
                MonitorScope::Program => (0..self.num_state_sets).for_each(|ss| mask.set(ss)),
                MonitorScope::StateSet(ss) => mask.set(ss.index()),
            }
        }
    }

    /// Return the index of an equal mask, appending it if it is new
    pub fn intern(&mut self, mask: &Mask) -> MaskIndex {
        if let Some(index) = self.masks.get_index_of(mask) {
            return MaskIndex(index as u32);
        }
        let (index, _) = self.masks.insert_full(mask.clone());
        MaskIndex(index as u32)
    }

    pub fn get(&self, index: MaskIndex) -> Option<&Mask> {
        self.masks.get_index(index.index())
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Canonical masks in index order
    pub fn masks(&self) -> impl Iterator<Item = &Mask> {
        self.masks.iter()
    }

    pub fn into_masks(self) -> Vec<Mask> {
        self.masks.into_iter().collect()
    }
}

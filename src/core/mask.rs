/*!
 * Bit Masks
 * Fixed-width word bitsets addressed by linear bit number
 *
 * Every mask in the sequencer shares this layout: bit `n` lives in word
 * `n / NBITS` at position `n % NBITS`. The same encoding is used for the
 * generated monitor masks, the per-flag synced-channel sets and the
 * per-state-set event masks, so compile-time tables and run-time control
 * blocks agree bit for bit.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Word type of every mask
pub type SeqMask = u32;

/// Number of bits in one mask word
pub const NBITS: usize = SeqMask::BITS as usize;

/// Number of words needed to hold bits `0..=max_bit_num`
#[inline(always)]
pub const fn nwords(max_bit_num: usize) -> usize {
    1 + max_bit_num / NBITS
}

/// Set bit `bitnum` in a caller-sized word slice
#[inline(always)]
pub fn bit_set(words: &mut [SeqMask], bitnum: usize) {
    words[bitnum / NBITS] |= 1 << (bitnum % NBITS);
}

/// Clear bit `bitnum` in a caller-sized word slice
#[inline(always)]
pub fn bit_clear(words: &mut [SeqMask], bitnum: usize) {
    words[bitnum / NBITS] &= !(1 << (bitnum % NBITS));
}

/// Test bit `bitnum` in a caller-sized word slice
#[inline(always)]
pub fn bit_test(words: &[SeqMask], bitnum: usize) -> bool {
    words[bitnum / NBITS] & (1 << (bitnum % NBITS)) != 0
}

/// Owned bitset with word-exact equality
///
/// The word count is fixed at construction from the largest bit number the
/// owner will ever address. Addressing a bit beyond that is a defect in the
/// caller and panics.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mask {
    words: Vec<SeqMask>,
}

impl Mask {
    /// Create an all-zero mask able to hold bits `0..=max_bit_num`
    pub fn with_max_bit(max_bit_num: usize) -> Self {
        Self {
            words: vec![0; nwords(max_bit_num)],
        }
    }

    /// Wrap an existing word vector
    pub fn from_words(words: Vec<SeqMask>) -> Self {
        Self { words }
    }

    #[inline]
    pub fn words(&self) -> &[SeqMask] {
        &self.words
    }

    #[inline]
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Number of addressable bits
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len() * NBITS
    }

    #[inline(always)]
    pub fn set(&mut self, bitnum: usize) {
        bit_set(&mut self.words, bitnum);
    }

    #[inline(always)]
    pub fn clear(&mut self, bitnum: usize) {
        bit_clear(&mut self.words, bitnum);
    }

    #[inline(always)]
    pub fn test(&self, bitnum: usize) -> bool {
        bit_test(&self.words, bitnum)
    }

    /// Reset every word to zero, keeping the size
    pub fn clear_all(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate the numbers of all set bits in ascending order
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(n, &word)| {
            (0..NBITS)
                .filter(move |bit| word & (1 << bit) != 0)
                .map(move |bit| n * NBITS + bit)
        })
    }
}

/// Binary rendering of one word, most significant bit first, bytes separated by `'`
pub struct WordBin(pub SeqMask);

impl fmt::Display for WordBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in (0..NBITS).rev() {
            write!(f, "{}", (self.0 >> bit) & 1)?;
            if bit % 8 == 0 && bit != 0 {
                f.write_str("'")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mask[")?;
        for (n, &word) in self.words.iter().enumerate() {
            if n > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", WordBin(word))?;
        }
        f.write_str("]")
    }
}

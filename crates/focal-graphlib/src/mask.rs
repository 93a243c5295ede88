//! Fixed-width bitsets over node ids.

use serde::{Deserialize, Serialize};
use std::fmt;

const WORD_BITS: usize = 64;

/// A set of node ids in `[0, universe)`, stored as packed `u64` words.
///
/// Binary operations accept masks of different universes; missing words read as zero.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NeighborMask {
    universe: usize,
    words: Vec<u64>,
}

impl NeighborMask {
    pub fn new(universe: usize) -> Self {
        Self {
            universe,
            words: vec![0; universe.div_ceil(WORD_BITS)],
        }
    }

    pub fn from_bits(universe: usize, bits: impl IntoIterator<Item = usize>) -> Self {
        let mut m = Self::new(universe);
        for b in bits {
            m.insert(b);
        }
        m
    }

    pub fn universe(&self) -> usize {
        self.universe
    }

    /// Sets `bit`; returns `true` if it was not set before.
    ///
    /// Panics when `bit` is outside the universe.
    pub fn insert(&mut self, bit: usize) -> bool {
        assert!(
            bit < self.universe,
            "bit {bit} out of range for a mask over {} nodes",
            self.universe
        );
        let (w, mask) = (bit / WORD_BITS, 1u64 << (bit % WORD_BITS));
        let was_set = self.words[w] & mask != 0;
        self.words[w] |= mask;
        !was_set
    }

    pub fn remove(&mut self, bit: usize) -> bool {
        if bit >= self.universe {
            return false;
        }
        let (w, mask) = (bit / WORD_BITS, 1u64 << (bit % WORD_BITS));
        let was_set = self.words[w] & mask != 0;
        self.words[w] &= !mask;
        was_set
    }

    pub fn contains(&self, bit: usize) -> bool {
        bit < self.universe && self.words[bit / WORD_BITS] & (1u64 << (bit % WORD_BITS)) != 0
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn union_with(&mut self, other: &NeighborMask) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
            self.universe = other.universe;
        }
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    pub fn intersection_count(&self, other: &NeighborMask) -> usize {
        self.words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| (a & b).count_ones() as usize)
            .sum()
    }

    pub fn union_count(&self, other: &NeighborMask) -> usize {
        self.zip_longest(other, |a, b| a | b)
    }

    pub fn symmetric_difference_count(&self, other: &NeighborMask) -> usize {
        self.zip_longest(other, |a, b| a ^ b)
    }

    /// `true` when every bit of `other` is also set in `self`.
    pub fn is_superset(&self, other: &NeighborMask) -> bool {
        other.words.iter().enumerate().all(|(i, &b)| {
            let a = self.words.get(i).copied().unwrap_or(0);
            b & !a == 0
        })
    }

    pub fn iter(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    fn zip_longest(&self, other: &NeighborMask, op: impl Fn(u64, u64) -> u64) -> usize {
        let len = self.words.len().max(other.words.len());
        (0..len)
            .map(|i| {
                let a = self.words.get(i).copied().unwrap_or(0);
                let b = other.words.get(i).copied().unwrap_or(0);
                op(a, b).count_ones() as usize
            })
            .sum()
    }
}

impl fmt::Debug for NeighborMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a NeighborMask {
    type Item = usize;
    type IntoIter = Ones<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over the set bits of a [`NeighborMask`].
pub struct Ones<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let tz = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.index * WORD_BITS + tz);
            }
            self.index += 1;
            self.current = *self.words.get(self.index)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NeighborMask;

    #[test]
    fn ones_cross_word_boundaries() {
        let m = NeighborMask::from_bits(200, [0, 63, 64, 130, 199]);
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![0, 63, 64, 130, 199]);
        assert_eq!(m.count(), 5);
    }

    #[test]
    fn set_algebra_counts() {
        let a = NeighborMask::from_bits(10, [1, 2, 3]);
        let b = NeighborMask::from_bits(10, [3, 4]);
        assert_eq!(a.intersection_count(&b), 1);
        assert_eq!(a.union_count(&b), 4);
        assert_eq!(a.symmetric_difference_count(&b), 3);
        assert!(!a.is_superset(&b));

        let mut c = a.clone();
        c.union_with(&b);
        assert!(c.is_superset(&a) && c.is_superset(&b));
    }

    #[test]
    fn empty_mask_iterates_nothing() {
        let m = NeighborMask::new(0);
        assert_eq!(m.iter().next(), None);
        assert!(m.is_empty());
    }
}

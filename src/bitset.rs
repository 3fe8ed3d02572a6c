//! Bitset implementation backed by a `Vec<u64>`.
//!
//! Used both as the archetype component mask (sized to `MAX_ID`) and as the
//! state machine's `transitionable_from` marker (sized to the state count).

/// Drop trailing all-zero words so two sets with the same highest set bit
/// always compare/hash equal regardless of how many words a prior operation
/// allocated along the way.
fn truncate_trailing_zeros(words: &mut Vec<u64>) {
    let new_len = words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1);
    words.truncate(new_len);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Create a new BitSet capable of holding at least `capacity` bits.
    pub fn with_capacity(capacity: usize) -> Self {
        let num_words = capacity.div_ceil(64);
        Self {
            words: vec![0; num_words],
        }
    }

    /// Set the bit at `index` to true.
    /// Resizes automatically if index is out of bounds.
    pub fn set(&mut self, index: usize) {
        let (word_idx, bit_idx) = (index / 64, index % 64);
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }
        self.words[word_idx] |= 1 << bit_idx;
    }

    /// Flip the bit at `index`.
    pub fn toggle(&mut self, index: usize) {
        let (word_idx, bit_idx) = (index / 64, index % 64);
        if word_idx >= self.words.len() {
            self.words.resize(word_idx + 1, 0);
        }
        self.words[word_idx] ^= 1 << bit_idx;
    }

    /// Check if the bit at `index` is set.
    pub fn contains(&self, index: usize) -> bool {
        let (word_idx, bit_idx) = (index / 64, index % 64);
        if word_idx >= self.words.len() {
            return false;
        }
        (self.words[word_idx] & (1 << bit_idx)) != 0
    }

    /// Returns true if this set shares any set bits with `other`.
    pub fn intersects(&self, other: &Self) -> bool {
        let len = std::cmp::min(self.words.len(), other.words.len());
        for i in 0..len {
            if (self.words[i] & other.words[i]) != 0 {
                return true;
            }
        }
        false
    }

    /// Returns true if every bit set in `other` is also set in `self`.
    pub fn is_superset_of(&self, other: &Self) -> bool {
        for (i, &word) in other.words.iter().enumerate() {
            let mine = self.words.get(i).copied().unwrap_or(0);
            if mine & word != word {
                return false;
            }
        }
        true
    }

    /// Bitwise union of `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let len = std::cmp::max(self.words.len(), other.words.len());
        let mut words = vec![0u64; len];
        for i in 0..len {
            words[i] = self.words.get(i).copied().unwrap_or(0) | other.words.get(i).copied().unwrap_or(0);
        }
        truncate_trailing_zeros(&mut words);
        Self { words }
    }

    /// `self` with every bit in `other` cleared.
    pub fn difference(&self, other: &Self) -> Self {
        let mut words = self.words.clone();
        for (i, &word) in other.words.iter().enumerate() {
            if i < words.len() {
                words[i] &= !word;
            }
        }
        truncate_trailing_zeros(&mut words);
        Self { words }
    }

    /// Returns iterator over indices of set bits
    pub fn ones(&self) -> OnesIter {
        OnesIter {
            bitset: self,
            word_idx: 0,
            current_word: if self.words.is_empty() {
                0
            } else {
                self.words[0]
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}

pub struct OnesIter<'a> {
    bitset: &'a BitSet,
    word_idx: usize,
    current_word: u64,
}

impl<'a> Iterator for OnesIter<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current_word != 0 {
                let trailing = self.current_word.trailing_zeros();
                self.current_word &= !(1 << trailing);
                return Some(self.word_idx * 64 + trailing as usize);
            }

            self.word_idx += 1;
            if self.word_idx >= self.bitset.words.len() {
                return None;
            }
            self.current_word = self.bitset.words[self.word_idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_contains() {
        let mut b = BitSet::new();
        b.set(0);
        b.set(65);
        assert!(b.contains(0));
        assert!(b.contains(65));
        assert!(!b.contains(1));
    }

    #[test]
    fn toggle_flips_bit() {
        let mut b = BitSet::new();
        b.toggle(3);
        assert!(b.contains(3));
        b.toggle(3);
        assert!(!b.contains(3));
    }

    #[test]
    fn superset_and_union() {
        let mut a = BitSet::new();
        a.set(0);
        a.set(1);
        let mut b = BitSet::new();
        b.set(0);
        assert!(a.is_superset_of(&b));
        assert!(!b.is_superset_of(&a));

        let mut c = BitSet::new();
        c.set(2);
        let u = a.union(&c);
        assert!(u.contains(0) && u.contains(1) && u.contains(2));
    }

    #[test]
    fn difference_clears_bits() {
        let mut a = BitSet::new();
        a.set(0);
        a.set(1);
        let mut b = BitSet::new();
        b.set(1);
        let d = a.difference(&b);
        assert!(d.contains(0));
        assert!(!d.contains(1));
    }

    #[test]
    fn difference_truncates_trailing_zero_words_past_64_bits() {
        let mut a = BitSet::new();
        a.set(0);
        a.set(70);
        let mut b = BitSet::new();
        b.set(70);
        let d = a.difference(&b);

        let mut canonical = BitSet::new();
        canonical.set(0);

        assert_eq!(d, canonical);
        let mut h1 = std::collections::hash_map::DefaultHasher::new();
        let mut h2 = std::collections::hash_map::DefaultHasher::new();
        use std::hash::{Hash, Hasher};
        d.hash(&mut h1);
        canonical.hash(&mut h2);
        assert_eq!(h1.finish(), h2.finish());
    }

    #[test]
    fn union_truncates_trailing_zero_words() {
        let mut a = BitSet::new();
        a.set(0);
        let b = BitSet::with_capacity(256);
        let u = a.union(&b);

        let mut canonical = BitSet::new();
        canonical.set(0);
        assert_eq!(u, canonical);
    }

    #[test]
    fn equal_masks_hash_equal() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut a = BitSet::new();
        a.set(4);
        let mut b = BitSet::new();
        b.set(4);
        assert_eq!(a, b);

        let mut ha = DefaultHasher::new();
        a.hash(&mut ha);
        let mut hb = DefaultHasher::new();
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }
}

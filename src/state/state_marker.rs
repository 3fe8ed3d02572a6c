// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Compact bitset over state ids, used by [`crate::state::machine::StateMachine`]
//! to record which source states a given state is transitionable from.

use crate::bitset::BitSet;

/// A set of state ids, sized to hold every id in `0..last_state_id_plus_one`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StateMarker {
    bits: BitSet,
}

impl StateMarker {
    /// An empty marker sized to hold ids up to `last_state_id_plus_one - 1`.
    pub fn new(last_state_id_plus_one: u32) -> Self {
        Self {
            bits: BitSet::with_capacity(last_state_id_plus_one as usize),
        }
    }

    /// A marker with every id in `true_states` already set.
    pub fn from_states(last_state_id_plus_one: u32, true_states: &[u32]) -> Self {
        let mut marker = Self::new(last_state_id_plus_one);
        for &id in true_states {
            marker.set(id);
        }
        marker
    }

    pub fn set(&mut self, id: u32) {
        self.bits.set(id as usize);
    }

    pub fn toggle(&mut self, id: u32) {
        self.bits.toggle(id as usize);
    }

    pub fn test(&self, id: u32) -> bool {
        self.bits.contains(id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_states_marks_every_listed_id() {
        let marker = StateMarker::from_states(4, &[0, 2]);
        assert!(marker.test(0));
        assert!(!marker.test(1));
        assert!(marker.test(2));
        assert!(!marker.test(3));
    }

    #[test]
    fn toggle_flips_membership() {
        let mut marker = StateMarker::new(8);
        assert!(!marker.test(5));
        marker.toggle(5);
        assert!(marker.test(5));
        marker.toggle(5);
        assert!(!marker.test(5));
    }
}

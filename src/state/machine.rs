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

//! Hierarchical state machine: a flat vector of states plus a `current`
//! index, driven one tick at a time by [`StateMachine::update`].

use std::hash::Hash;

use ahash::AHashMap;

use crate::error::{EcsError, Result};
use crate::orientation::HasOrientation;

/// Anything usable as a state identifier: copyable, hashable, and dense
/// enough to index a [`crate::state::state_marker::StateMarker`].
pub trait StateId: Copy + Eq + Hash + Into<u32> {}

impl<T: Copy + Eq + Hash + Into<u32>> StateId for T {}

/// One state in a [`StateMachine`]. Collapses the original's separate
/// "generic state" base into default method bodies on this trait: a leaf
/// state overrides only what it needs, a [`crate::state::node_state::NodeState`]
/// overrides `update` and `full_name` to delegate into an embedded machine.
pub trait State<Owner: HasOrientation, Id: StateId> {
    fn id(&self) -> Id;
    fn name(&self) -> &str;

    /// Whether this state may be transitioned into from `from`.
    fn transitionable_from(&self, from: Id) -> bool;

    fn enter(&mut self, _owner: &mut Owner, _from: Id) {}
    fn leave(&mut self, _owner: &mut Owner, _to: Id) {}

    /// Runs once per tick while this state is current. Returning `false`
    /// skips transition evaluation for the tick (the state is still "busy").
    fn update(&mut self, _owner: &mut Owner, _frames_in_state: u32) -> bool {
        true
    }

    /// Whether this state is a legal transition target right now, and if so
    /// which way the owner should end up facing. `Unspecified` means "no".
    fn is_possible(&self, owner: &Owner) -> crate::orientation::Orientation {
        owner.orientation()
    }

    fn full_name(&self, frames_in_state: u32) -> String {
        format!("{} ({})", self.name(), frames_in_state)
    }
}

/// Owns a flat set of states and ticks whichever one is current, switching
/// to another state when [`State::is_possible`] reports a definite
/// orientation for a candidate that lists the current state in its
/// `transitionable_from` set.
pub struct StateMachine<Owner: HasOrientation, Id: StateId> {
    states: Vec<Box<dyn State<Owner, Id>>>,
    state_ids: AHashMap<Id, usize>,
    current: Option<usize>,
    frames_in_state: u32,
}

impl<Owner: HasOrientation, Id: StateId> StateMachine<Owner, Id> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            state_ids: AHashMap::new(),
            current: None,
            frames_in_state: 0,
        }
    }

    /// Install a state. Calling this twice with the same id overwrites the
    /// earlier entry's slot in `state_ids` but leaves the stale `Box` in
    /// `states`; installing duplicate ids is a caller error.
    pub fn add_state(&mut self, state: Box<dyn State<Owner, Id>>) {
        let id = state.id();
        self.state_ids.insert(id, self.states.len());
        self.states.push(state);
    }

    pub fn set_initial_state(&mut self, id: Id) -> Result<()> {
        let idx = *self.state_ids.get(&id).ok_or(EcsError::UnknownState)?;
        self.current = Some(idx);
        self.frames_in_state = 0;
        Ok(())
    }

    pub fn current_id(&self) -> Option<Id> {
        self.current.map(|idx| self.states[idx].id())
    }

    pub fn frames_in_state(&self) -> u32 {
        self.frames_in_state
    }

    /// `current (frames) -> ...` for the active state, recursing into any
    /// embedded child machine via `State::full_name`.
    pub fn current_name(&self) -> String {
        match self.current {
            Some(idx) => self.states[idx].full_name(self.frames_in_state),
            None => "<no current state>".to_string(),
        }
    }

    pub fn switch_current_state(&mut self, owner: &mut Owner, target: Id) -> Result<()> {
        let target_idx = *self.state_ids.get(&target).ok_or(EcsError::UnknownState)?;
        self.switch_to_index(owner, target_idx);
        Ok(())
    }

    fn switch_to_index(&mut self, owner: &mut Owner, target_idx: usize) {
        let current_idx = self.current.expect("switch_current_state called with no current state");
        if current_idx == target_idx {
            let id = self.states[target_idx].id();
            self.states[target_idx].leave(owner, id);
            self.states[target_idx].enter(owner, id);
        } else {
            let current_id = self.states[current_idx].id();
            let target_id = self.states[target_idx].id();
            let (current_state, target_state) = self.state_pair_mut(current_idx, target_idx);
            current_state.leave(owner, target_id);
            target_state.enter(owner, current_id);
        }
        self.current = Some(target_idx);
        self.frames_in_state = 0;
    }

    fn state_pair_mut(&mut self, a: usize, b: usize) -> (&mut Box<dyn State<Owner, Id>>, &mut Box<dyn State<Owner, Id>>) {
        assert_ne!(a, b, "state_pair_mut requires two distinct indices");
        if a < b {
            let (left, right) = self.states.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.states.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// One tick: run the current state's `update`, then evaluate transition
    /// candidates if it reported readiness. `frame` is accepted for
    /// signature symmetry with the original driver loop but is not read;
    /// elapsed-time bookkeeping is `frames_in_state`, tracked internally.
    pub fn update(&mut self, owner: &mut Owner, _frame: u32) -> bool {
        let current_idx = self.current.expect("update called with no current state");
        let ready = self.states[current_idx].update(owner, self.frames_in_state);
        let fired = ready && self.attempt_transition(owner);
        if !fired {
            self.frames_in_state += 1;
        }
        fired
    }

    fn attempt_transition(&mut self, owner: &mut Owner) -> bool {
        let current_idx = self.current.expect("attempt_transition called with no current state");
        let current_id = self.states[current_idx].id();
        for idx in 0..self.states.len() {
            if !self.states[idx].transitionable_from(current_id) {
                continue;
            }
            let orientation = self.states[idx].is_possible(owner);
            if orientation != crate::orientation::Orientation::Unspecified {
                owner.set_orientation(orientation);
                self.switch_to_index(owner, idx);
                return true;
            }
        }
        false
    }
}

impl<Owner: HasOrientation, Id: StateId> Default for StateMachine<Owner, Id> {
    fn default() -> Self {
        Self::new()
    }
}

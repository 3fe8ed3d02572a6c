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

//! A state that is itself a state machine, for expressing sub-states
//! ("walking" containing "walking/left", "walking/right", ...).
//!
//! The original couples this through dual inheritance of a generic-state
//! base and a state-machine base. Rust has no multiple inheritance, so this
//! is composition instead: a [`NodeState`] embeds both a state descriptor
//! and a child [`StateMachine`], and implements [`State`] by delegating to
//! the child machine rather than by inheriting its behavior.

use crate::orientation::HasOrientation;
use crate::state::machine::{State, StateId, StateMachine};
use crate::state::state_marker::StateMarker;

pub struct NodeState<Owner: HasOrientation, Id: StateId> {
    id: Id,
    name: String,
    transitionable_from: StateMarker,
    machine: StateMachine<Owner, Id>,
    before_update: Option<Box<dyn FnMut(&mut Owner, u32)>>,
}

impl<Owner: HasOrientation, Id: StateId> NodeState<Owner, Id> {
    pub fn new(id: Id, name: impl Into<String>, transitionable_from: StateMarker) -> Self {
        Self {
            id,
            name: name.into(),
            transitionable_from,
            machine: StateMachine::new(),
            before_update: None,
        }
    }

    pub fn machine(&self) -> &StateMachine<Owner, Id> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut StateMachine<Owner, Id> {
        &mut self.machine
    }

    /// Install node-level logic to run once per `update`, before the child
    /// machine ticks. Mirrors the original's `GenericState::update` call
    /// that ran ahead of `StateMachine::update` on the same node.
    pub fn set_before_update(&mut self, hook: impl FnMut(&mut Owner, u32) + 'static) {
        self.before_update = Some(Box::new(hook));
    }
}

impl<Owner: HasOrientation, Id: StateId> State<Owner, Id> for NodeState<Owner, Id> {
    fn id(&self) -> Id {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn transitionable_from(&self, from: Id) -> bool {
        self.transitionable_from.test(from.into())
    }

    // Runs the node's own per-tick logic (if any) before delegating to the
    // child machine, matching the original's `GenericState::update` then
    // `StateMachine::update` call order.
    fn update(&mut self, owner: &mut Owner, frames_in_state: u32) -> bool {
        if let Some(hook) = self.before_update.as_mut() {
            hook(owner, frames_in_state);
        }
        self.machine.update(owner, 0)
    }

    fn full_name(&self, frames_in_state: u32) -> String {
        format!("{} ({}) -> {}", self.name, frames_in_state, self.machine.current_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Orientation;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Id {
        Moving,
        Left,
        Right,
    }

    impl From<Id> for u32 {
        fn from(id: Id) -> u32 {
            match id {
                Id::Moving => 0,
                Id::Left => 1,
                Id::Right => 2,
            }
        }
    }

    #[derive(Default)]
    struct Actor {
        orientation: Orientation,
        facing_right: bool,
    }

    impl HasOrientation for Actor {
        fn orientation(&self) -> Orientation {
            self.orientation
        }
        fn set_orientation(&mut self, orientation: Orientation) {
            self.orientation = orientation;
        }
    }

    struct FacingLeaf(Id);

    impl State<Actor, Id> for FacingLeaf {
        fn id(&self) -> Id {
            self.0
        }
        fn name(&self) -> &str {
            match self.0 {
                Id::Left => "left",
                Id::Right => "right",
                Id::Moving => "moving",
            }
        }
        fn transitionable_from(&self, from: Id) -> bool {
            from != self.0
        }
        fn is_possible(&self, owner: &Actor) -> Orientation {
            match self.0 {
                Id::Left if !owner.facing_right => Orientation::Left,
                Id::Right if owner.facing_right => Orientation::Right,
                _ => Orientation::Unspecified,
            }
        }
    }

    fn node() -> NodeState<Actor, Id> {
        let mut node = NodeState::new(Id::Moving, "moving", StateMarker::new(3));
        node.machine_mut().add_state(Box::new(FacingLeaf(Id::Left)));
        node.machine_mut().add_state(Box::new(FacingLeaf(Id::Right)));
        node.machine_mut().set_initial_state(Id::Left).unwrap();
        node
    }

    #[test]
    fn update_ticks_the_embedded_machine() {
        let mut node = node();
        let mut actor = Actor::default();
        actor.facing_right = true;
        assert!(State::update(&mut node, &mut actor, 0));
        assert_eq!(node.machine().current_id(), Some(Id::Right));
    }

    #[test]
    fn full_name_reports_the_active_child() {
        let node = node();
        let name = node.full_name(2);
        assert!(name.starts_with("moving (2) ->"));
        assert!(name.contains("left"));
    }

    #[test]
    fn before_update_hook_runs_ahead_of_the_child_machine() {
        use std::cell::Cell;
        use std::rc::Rc;

        let mut node = node();
        let calls = Rc::new(Cell::new(0u32));
        let calls_in_hook = Rc::clone(&calls);
        node.set_before_update(move |actor: &mut Actor, _frames_in_state| {
            calls_in_hook.set(calls_in_hook.get() + 1);
            actor.facing_right = true;
        });

        let mut actor = Actor::default();
        assert!(State::update(&mut node, &mut actor, 5));
        assert_eq!(calls.get(), 1);
        assert_eq!(node.machine().current_id(), Some(Id::Right));
    }

    #[test]
    fn before_update_hook_is_optional() {
        let mut node = node();
        let mut actor = Actor::default();
        actor.facing_right = true;
        assert!(State::update(&mut node, &mut actor, 0));
        assert_eq!(node.machine().current_id(), Some(Id::Right));
    }
}

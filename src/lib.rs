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

//! Archetype ECS - single-threaded Entity Component System with a
//! hierarchical state machine harness for driving per-entity behavior.
//!
//! Entities are rows in Structure-of-Arrays archetype storage, keyed by a
//! dense bitmask of the component types they own. There is no scheduler or
//! system graph here: callers drive [`Registry::make_query`] results and
//! [`state::StateMachine`] updates directly from their own loop.

pub mod archetype;
pub mod bitset;
pub mod column;
pub mod component;
pub mod debug;
pub mod entity;
pub mod entity_view;
pub mod error;
pub mod orientation;
pub mod prelude;
pub mod query;
pub mod registry;
pub mod state;

pub use archetype::Archetype;
pub use component::{Bundle, Component, ComponentSet};
pub use entity::EntityIndex;
pub use entity_view::EntityView;
pub use error::{EcsError, Result};
pub use orientation::{HasOrientation, Orientation};
pub use query::Query;
pub use registry::Registry;
pub use state::{NodeState, State, StateId, StateMachine, StateMarker};

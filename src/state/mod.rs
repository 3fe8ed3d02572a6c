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

//! Hierarchical state machine harness, driven independently of the ECS
//! registry: states operate on a caller-supplied `Owner` rather than on
//! entities directly.

pub mod machine;
pub mod node_state;
pub mod state_marker;

pub use machine::{State, StateId, StateMachine};
pub use node_state::NodeState;
pub use state_marker::StateMarker;

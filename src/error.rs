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

//! Error types

use std::fmt;

/// Errors surfaced by the ECS storage/query engine and the state machine harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A component type was used before it was registered with the component registry.
    UnknownComponent,

    /// An archetype was asked to emplace into a column it does not own.
    ///
    /// This indicates a registry/mask desynchronization during migration and is
    /// treated as fatal by callers.
    MissingColumn,

    /// An entity index referenced a slot that does not exist (e.g. already
    /// swap-removed) in an archetype that does exist.
    EntityNotFound,

    /// An entity index referenced an archetype index that does not exist.
    ArchetypeNotFound,

    /// A state id was used in `set_initial_state`/`switch_current_state` that was
    /// never installed with `add_state`.
    UnknownState,
}

impl fmt::Display for EcsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcsError::UnknownComponent => write!(f, "component type not registered"),
            EcsError::MissingColumn => write!(f, "archetype missing expected component column"),
            EcsError::EntityNotFound => write!(f, "entity index does not reference a live entity"),
            EcsError::ArchetypeNotFound => write!(f, "entity index references an archetype that does not exist"),
            EcsError::UnknownState => write!(f, "state id not registered with this state machine"),
        }
    }
}

impl std::error::Error for EcsError {}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EcsError>;

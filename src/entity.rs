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

//! Entity location handles.
//!
//! Neither field here is a stable identity: `archetype` changes whenever a
//! migration moves the entity to a different component set, and `slot`
//! changes whenever some other entity in the same archetype is
//! swap-removed ahead of it. Callers that need to hold onto an entity
//! across calls that might migrate or remove other entities must re-derive
//! the index (for example, by re-running a query) rather than caching one.

/// Where one entity's row currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityIndex {
    pub archetype: usize,
    pub slot: usize,
}

impl EntityIndex {
    pub fn new(archetype: usize, slot: usize) -> Self {
        Self { archetype, slot }
    }
}

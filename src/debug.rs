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

//! Lightweight inspector for debugging a [`Registry`] from the outside.
//!
//! The registry has no idea what a component's contents mean, so this can
//! only report ids and counts, never component values.

use crate::entity::EntityIndex;
use crate::registry::Registry;

/// Per-archetype summary: how many component columns, how many live rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchetypeInfo {
    pub index: usize,
    pub component_count: usize,
    pub entity_count: usize,
}

/// Read-only inspector over a [`Registry`]. Holds no state of its own.
pub struct RegistryInspector;

impl RegistryInspector {
    pub fn archetype_summary(registry: &Registry) -> Vec<ArchetypeInfo> {
        (0..registry.archetype_count())
            .map(|index| {
                let archetype = registry.archetype(index);
                ArchetypeInfo {
                    index,
                    component_count: archetype.ids_ascending().len(),
                    entity_count: archetype.len(),
                }
            })
            .collect()
    }

    pub fn print_summary(registry: &Registry) {
        println!("=== Registry Summary ===");
        println!("Archetypes: {}", registry.archetype_count());
        for info in Self::archetype_summary(registry) {
            println!(
                "Archetype {}: {} entities, {} components",
                info.index, info.entity_count, info.component_count
            );
        }
    }

    /// Component ids owned by `idx`'s archetype, ascending (§4.3's
    /// tie-break order). `None` if `idx` does not reference a live row.
    pub fn entity_component_ids(registry: &Registry, idx: EntityIndex) -> Option<Vec<u32>> {
        if !registry.contains_entity(idx) {
            return None;
        }
        Some(
            registry
                .archetype(idx.archetype)
                .ids_ascending()
                .into_iter()
                .map(|id| id.raw())
                .collect(),
        )
    }

    pub fn print_entity(registry: &Registry, idx: EntityIndex) {
        match Self::entity_component_ids(registry, idx) {
            Some(ids) => println!("Entity {{archetype: {}, slot: {}}}: components {:?}", idx.archetype, idx.slot, ids),
            None => println!("Entity {{archetype: {}, slot: {}}}: not found", idx.archetype, idx.slot),
        }
    }
}

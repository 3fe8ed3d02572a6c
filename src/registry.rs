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

//! Registry: owns every archetype and routes entity creation, component
//! migration, and removal between them.

use ahash::AHashMap;

#[cfg(feature = "profiling")]
use tracing::trace;

use crate::archetype::Archetype;
use crate::bitset::BitSet;
use crate::component::{Bundle, Component, ComponentId, ComponentRegistry, ComponentSet};
use crate::entity::EntityIndex;
use crate::error::{EcsError, Result};
use crate::query::Query;

fn mask_from_ids(ids: &[ComponentId]) -> BitSet {
    let mut mask = BitSet::new();
    for &id in ids {
        mask.set(id.bit_index());
    }
    mask
}

/// Owns all archetype storage for one ECS world and is the sole entry point
/// for creating, migrating, and removing entities.
///
/// `Send`/`Sync` are deliberately not implemented: the crate is
/// single-threaded by contract, and a `Registry` holds raw pointers
/// transiently (via [`crate::entity_view::EntityView`]) that must not cross
/// threads.
pub struct Registry {
    archetypes: Vec<Archetype>,
    archetype_index: AHashMap<BitSet, usize>,
    components: ComponentRegistry,
    // Opts the whole type out of the Send/Sync auto traits: this crate's
    // single-threaded contract (see crate root docs) is enforced at the
    // type level, not just in prose.
    _not_thread_safe: std::marker::PhantomData<*const ()>,
}

impl Registry {
    /// A fresh registry with no archetypes yet. Archetypes (including the
    /// zero-component one, if a caller ever reaches it) are created lazily
    /// by `get_or_create_archetype` the first time a matching mask is seen.
    pub fn new() -> Self {
        Self {
            archetypes: Vec::with_capacity(16),
            archetype_index: AHashMap::with_capacity(16),
            components: ComponentRegistry::new(),
            _not_thread_safe: std::marker::PhantomData,
        }
    }

    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    pub(crate) fn archetype(&self, index: usize) -> &Archetype {
        &self.archetypes[index]
    }

    pub(crate) fn archetype_mut(&mut self, index: usize) -> &mut Archetype {
        &mut self.archetypes[index]
    }

    pub(crate) fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// Whether `idx` currently references a live row. `false` for an index
    /// that was valid immediately after its return but has since been
    /// swap-removed or migrated away.
    pub fn contains_entity(&self, idx: EntityIndex) -> bool {
        self.archetypes.get(idx.archetype).is_some_and(|archetype| idx.slot < archetype.len())
    }

    fn check_entity(&self, idx: EntityIndex) -> Result<()> {
        let archetype = self.archetypes.get(idx.archetype).ok_or(EcsError::ArchetypeNotFound)?;
        if idx.slot >= archetype.len() {
            return Err(EcsError::EntityNotFound);
        }
        Ok(())
    }

    fn get_or_create_archetype<B: Bundle>(&mut self, mask: BitSet, reserve: usize) -> usize {
        if let Some(&idx) = self.archetype_index.get(&mask) {
            return idx;
        }
        let mut archetype = Archetype::empty();
        B::add_columns(&mut self.components, &mut archetype, reserve);
        let idx = self.archetypes.len();
        self.archetypes.push(archetype);
        self.archetype_index.insert(mask, idx);
        idx
    }

    fn get_or_create_migrated_archetype<B: ComponentSet>(&mut self, mask: BitSet, old_idx: usize, reserve: usize) -> usize {
        if let Some(&idx) = self.archetype_index.get(&mask) {
            return idx;
        }
        let mut archetype = Archetype::empty();
        archetype.add_types_from(&self.archetypes[old_idx], reserve);
        B::add_columns(&mut self.components, &mut archetype, reserve);
        let idx = self.archetypes.len();
        self.archetypes.push(archetype);
        self.archetype_index.insert(mask, idx);
        idx
    }

    fn get_or_create_reduced_archetype(&mut self, mask: BitSet, old_idx: usize, except: &[ComponentId], reserve: usize) -> usize {
        if let Some(&idx) = self.archetype_index.get(&mask) {
            return idx;
        }
        let mut archetype = Archetype::empty();
        archetype.add_types_reduced(&self.archetypes[old_idx], except, reserve);
        let idx = self.archetypes.len();
        self.archetypes.push(archetype);
        self.archetype_index.insert(mask, idx);
        idx
    }

    /// Two distinct archetypes, mutably, regardless of which index is larger.
    fn archetype_pair_mut(&mut self, a: usize, b: usize) -> (&mut Archetype, &mut Archetype) {
        assert_ne!(a, b, "cannot borrow the same archetype twice");
        if a < b {
            let (left, right) = self.archetypes.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.archetypes.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Spawn a new entity with the given bundle of components.
    pub fn create_entity<B: Bundle>(&mut self, values: B) -> EntityIndex {
        let ids = B::ids(&mut self.components);
        let mask = mask_from_ids(&ids);
        let arch_idx = self.get_or_create_archetype::<B>(mask, 10);

        let archetype = &mut self.archetypes[arch_idx];
        let slot = archetype.add_entity();
        values.emplace_into(archetype, slot, &ids);

        #[cfg(feature = "profiling")]
        trace!(archetype = arch_idx, slot, "created entity");

        EntityIndex::new(arch_idx, slot)
    }

    /// Attach or overwrite components on an existing entity, migrating it to
    /// a new archetype if any component in `values` isn't already owned by
    /// `idx`'s current archetype.
    pub fn emplace_components<B: Bundle>(&mut self, idx: EntityIndex, values: B) -> Result<EntityIndex> {
        self.check_entity(idx)?;
        let ids = B::ids(&mut self.components);
        let bundle_mask = mask_from_ids(&ids);
        let old_mask = self.archetypes[idx.archetype].mask().clone();

        if old_mask.is_superset_of(&bundle_mask) {
            let archetype = &mut self.archetypes[idx.archetype];
            values.assign_into(archetype, idx.slot, &ids);
            return Ok(idx);
        }

        let new_mask = old_mask.union(&bundle_mask);
        let new_arch_idx = self.get_or_create_migrated_archetype::<B>(new_mask, idx.archetype, 10);

        let carried_ids: Vec<ComponentId> = self.archetypes[idx.archetype]
            .ids_ascending()
            .into_iter()
            .filter(|id| !ids.contains(id))
            .collect();

        // Any bundle id the old archetype already held is about to be
        // overwritten by a fresh value in the new archetype, so its old
        // value is discarded here rather than carried over.
        for &id in &ids {
            self.archetypes[idx.archetype].drop_component_at(id, idx.slot);
        }

        let new_slot = self.archetypes[new_arch_idx].add_entity();
        {
            let (old_archetype, new_archetype) = self.archetype_pair_mut(idx.archetype, new_arch_idx);
            values.emplace_into(new_archetype, new_slot, &ids);
            for &id in &carried_ids {
                old_archetype.move_component_to(id, idx.slot, new_archetype, new_slot);
            }
            old_archetype.vacate_after_migration(idx.slot);
        }

        #[cfg(feature = "profiling")]
        trace!(from = idx.archetype, to = new_arch_idx, "migrated entity");

        Ok(EntityIndex::new(new_arch_idx, new_slot))
    }

    /// Detach the components named by `S` from an entity, migrating it to a
    /// narrower archetype. A no-op (returns `idx` unchanged) if none of `S`
    /// are present.
    pub fn remove_components<S: ComponentSet>(&mut self, idx: EntityIndex) -> Result<EntityIndex> {
        self.check_entity(idx)?;
        let except_ids = S::ids(&mut self.components);
        let old_mask = self.archetypes[idx.archetype].mask().clone();
        let except_mask = mask_from_ids(&except_ids);
        let new_mask = old_mask.difference(&except_mask);

        if new_mask == old_mask {
            return Ok(idx);
        }

        let new_arch_idx = self.get_or_create_reduced_archetype(new_mask, idx.archetype, &except_ids, 5);
        let carried_ids = self.archetypes[new_arch_idx].ids_ascending();
        let new_slot = self.archetypes[new_arch_idx].add_entity();

        {
            let (old_archetype, new_archetype) = self.archetype_pair_mut(idx.archetype, new_arch_idx);
            for &id in &carried_ids {
                old_archetype.move_component_to(id, idx.slot, new_archetype, new_slot);
            }
            for &id in &except_ids {
                old_archetype.drop_component_at(id, idx.slot);
            }
            old_archetype.vacate_after_migration(idx.slot);
        }

        #[cfg(feature = "profiling")]
        trace!(from = idx.archetype, to = new_arch_idx, "removed components, migrated entity");

        Ok(EntityIndex::new(new_arch_idx, new_slot))
    }

    /// Delete an entity outright.
    pub fn remove_entity(&mut self, idx: EntityIndex) -> Result<()> {
        self.check_entity(idx)?;
        self.archetypes[idx.archetype].remove_entity(idx.slot);
        Ok(())
    }

    pub fn get_component<T: Component>(&mut self, idx: EntityIndex) -> Result<&mut T> {
        self.check_entity(idx)?;
        let id = self.components.id_of::<T>();
        Ok(self.archetypes[idx.archetype].get_component_mut::<T>(id, idx.slot))
    }

    /// Build a query over every archetype that currently owns at least the
    /// components in `S`. Archetypes created afterwards are only picked up
    /// once the caller calls `Query::refresh`.
    pub fn make_query<S: ComponentSet>(&mut self) -> Query<S> {
        let ids = S::ids(&mut self.components);
        let archetype_indices = self.matching_archetypes(&ids);
        Query::new(ids, archetype_indices)
    }

    pub(crate) fn matching_archetypes(&self, ids: &[ComponentId]) -> Vec<usize> {
        self.archetypes
            .iter()
            .enumerate()
            .filter(|(_, archetype)| archetype.contains_components(ids))
            .map(|(index, _)| index)
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Health(i32);

    #[test]
    fn create_entity_creates_its_own_archetype_lazily() {
        let mut registry = Registry::new();
        assert_eq!(registry.archetype_count(), 0);
        let idx = registry.create_entity((Position { x: 1.0, y: 2.0 },));
        assert_eq!(idx.archetype, 0);
        assert_eq!(*registry.get_component::<Position>(idx).unwrap(), Position { x: 1.0, y: 2.0 });
    }

    #[test]
    fn emplace_components_migrates_on_new_type() {
        let mut registry = Registry::new();
        let idx = registry.create_entity((Position { x: 0.0, y: 0.0 },));
        let idx = registry.emplace_components(idx, (Velocity { dx: 3.0 },)).unwrap();
        assert_eq!(*registry.get_component::<Position>(idx).unwrap(), Position { x: 0.0, y: 0.0 });
        assert_eq!(*registry.get_component::<Velocity>(idx).unwrap(), Velocity { dx: 3.0 });
    }

    #[test]
    fn emplace_components_in_place_overwrites() {
        let mut registry = Registry::new();
        let idx = registry.create_entity((Position { x: 0.0, y: 0.0 },));
        let idx2 = registry.emplace_components(idx, (Position { x: 5.0, y: 5.0 },)).unwrap();
        assert_eq!(idx2.archetype, idx.archetype);
        assert_eq!(idx2.slot, idx.slot);
        assert_eq!(*registry.get_component::<Position>(idx2).unwrap(), Position { x: 5.0, y: 5.0 });
    }

    #[test]
    fn remove_components_migrates_to_narrower_archetype() {
        let mut registry = Registry::new();
        let idx = registry.create_entity((Position { x: 1.0, y: 1.0 }, Velocity { dx: 2.0 }));
        let idx = registry.remove_components::<(Velocity,)>(idx).unwrap();
        assert_eq!(*registry.get_component::<Position>(idx).unwrap(), Position { x: 1.0, y: 1.0 });
    }

    #[test]
    fn remove_entity_swaps_tail_row_into_hole() {
        let mut registry = Registry::new();
        let first = registry.create_entity((Health(10),));
        let second = registry.create_entity((Health(20),));
        registry.remove_entity(first).unwrap();
        assert_eq!(
            *registry.get_component::<Health>(EntityIndex::new(second.archetype, first.slot)).unwrap(),
            Health(20)
        );
    }

    #[test]
    fn stale_entity_index_after_removal_is_reported() {
        let mut registry = Registry::new();
        let only = registry.create_entity((Health(1),));
        registry.remove_entity(only).unwrap();
        assert!(!registry.contains_entity(only));
        assert_eq!(registry.get_component::<Health>(only), Err(EcsError::EntityNotFound));
    }

    #[test]
    fn out_of_range_archetype_index_is_reported() {
        let mut registry = Registry::new();
        let bogus = EntityIndex::new(7, 0);
        assert!(!registry.contains_entity(bogus));
        assert_eq!(registry.remove_entity(bogus), Err(EcsError::ArchetypeNotFound));
    }
}

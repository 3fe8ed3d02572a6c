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

//! Archetype storage: one Structure-of-Arrays row set per distinct
//! component mask.

use rustc_hash::FxHashMap;

use crate::bitset::BitSet;
use crate::column::ErasedColumn;
use crate::component::{Component, ComponentId};
use crate::entity_view::EntityView;

/// A set of entities sharing exactly the same component set, stored as one
/// [`ErasedColumn`] per component id plus a shared row count.
///
/// Columns never shrink their component set after creation: a column set is
/// declared once (`add_type`/`add_types_from`/`add_types_reduced`) before
/// any entity is added, because every column must always have the same
/// length as every other.
pub struct Archetype {
    mask: BitSet,
    columns: FxHashMap<ComponentId, ErasedColumn>,
    len: usize,
}

impl Archetype {
    pub fn empty() -> Self {
        Self {
            mask: BitSet::new(),
            columns: FxHashMap::default(),
            len: 0,
        }
    }

    pub fn mask(&self) -> &BitSet {
        &self.mask
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.columns.contains_key(&id)
    }

    pub fn contains_components(&self, ids: &[ComponentId]) -> bool {
        ids.iter().all(|&id| self.contains_component(id))
    }

    /// Component ids owned by this archetype, ascending.
    pub fn ids_ascending(&self) -> Vec<ComponentId> {
        let mut ids: Vec<ComponentId> = self.columns.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Allocate a fresh column for `T` at `id`, reserving `reserve` rows.
    /// No-op if the column already exists.
    pub fn add_type<T: Component>(&mut self, id: ComponentId, reserve: usize) {
        if self.columns.contains_key(&id) {
            return;
        }
        let mut column = ErasedColumn::new();
        column.allocate::<T>(reserve);
        self.columns.insert(id, column);
        self.mask.set(id.bit_index());
    }

    /// Adopt every column `other` owns (as empty, same-layout columns),
    /// reserving `reserve` rows in each.
    pub fn add_types_from(&mut self, other: &Archetype, reserve: usize) {
        for (&id, column) in other.columns.iter() {
            self.adopt_column(id, column, reserve);
        }
    }

    /// Adopt every column `other` owns except those listed in `except`.
    pub fn add_types_reduced(&mut self, other: &Archetype, except: &[ComponentId], reserve: usize) {
        for (&id, column) in other.columns.iter() {
            if except.contains(&id) {
                continue;
            }
            self.adopt_column(id, column, reserve);
        }
    }

    fn adopt_column(&mut self, id: ComponentId, source: &ErasedColumn, reserve: usize) {
        if self.columns.contains_key(&id) {
            return;
        }
        let mut column = source.clone_empty();
        column.reserve(reserve);
        self.columns.insert(id, column);
        self.mask.set(id.bit_index());
    }

    /// Push a default (uninitialized) row onto every column and return its
    /// slot. The archetype must already own at least one column, or have no
    /// columns by design (the empty, zero-component archetype).
    pub fn add_entity(&mut self) -> usize {
        for column in self.columns.values_mut() {
            column.push_default();
        }
        let slot = self.len;
        self.len += 1;
        slot
    }

    /// Swap-remove the row at `slot` from every column.
    pub fn remove_entity(&mut self, slot: usize) {
        for column in self.columns.values_mut() {
            column.swap_remove(slot);
        }
        self.len -= 1;
    }

    /// Write `value` into a row that has never held a live value for this
    /// column (a freshly added entity, or a migrated-in row).
    pub fn emplace_component<T: Component>(&mut self, id: ComponentId, slot: usize, value: T) {
        let column = self
            .columns
            .get_mut(&id)
            .expect("archetype missing expected component column");
        column.emplace(slot, value);
    }

    /// Overwrite a row that already holds a live value, dropping the old one.
    pub fn assign_component<T: Component>(&mut self, id: ComponentId, slot: usize, value: T) {
        let column = self
            .columns
            .get_mut(&id)
            .expect("archetype missing expected component column");
        column.assign(slot, value);
    }

    pub fn get_component<T: Component>(&self, id: ComponentId, slot: usize) -> &T {
        self.columns
            .get(&id)
            .expect("archetype missing expected component column")
            .get(slot)
    }

    pub fn get_component_mut<T: Component>(&mut self, id: ComponentId, slot: usize) -> &mut T {
        self.columns
            .get_mut(&id)
            .expect("archetype missing expected component column")
            .get_mut(slot)
    }

    /// Run the destructor over `id`'s value at `slot` without compacting.
    /// Used right before a migrating row's old value is discarded because a
    /// fresh value is about to replace it in a different archetype.
    pub fn drop_component_at(&mut self, id: ComponentId, slot: usize) {
        if let Some(column) = self.columns.get_mut(&id) {
            column.drop_at(slot);
        }
    }

    /// Relocate `id`'s value at `slot` into `dest` at `dest_slot`. Leaves
    /// `self`'s copy un-dropped; callers must follow with
    /// `vacate_after_migration`, never `remove_entity`, on this slot.
    pub fn move_component_to(&mut self, id: ComponentId, slot: usize, dest: &mut Archetype, dest_slot: usize) {
        let Some(source) = self.columns.get_mut(&id) else {
            return;
        };
        let Some(destination) = dest.columns.get_mut(&id) else {
            return;
        };
        source.move_value(slot, destination, dest_slot);
    }

    /// Compact `slot` out of every column without running any destructor.
    /// Every column's value at `slot` must already have been disposed of,
    /// either via `drop_component_at` or relocated via `move_component_to`.
    pub fn vacate_after_migration(&mut self, slot: usize) {
        for column in self.columns.values_mut() {
            column.take_swap_remove(slot);
        }
        self.len -= 1;
    }

    /// Build an [`EntityView`] over `slot` for the given component ids.
    ///
    /// The returned view's lifetime `'a` is intentionally not tied to
    /// `&mut self`'s borrow (see [`crate::query::ComponentFetch::fetch`] for
    /// why): this lets a `Query` hand the view to a callback that also
    /// holds a `&mut Registry`, at the cost of the view being the caller's
    /// responsibility not to outlive any mutation of these columns.
    pub fn make_view<'a>(&mut self, slot: usize, ids: &[ComponentId]) -> EntityView<'a> {
        let mut view = EntityView::new();
        for &id in ids {
            if let Some(column) = self.columns.get_mut(&id) {
                view.add_raw(id, column.raw_slot_ptr(slot));
            }
        }
        view
    }
}

impl Default for Archetype {
    fn default() -> Self {
        Self::empty()
    }
}

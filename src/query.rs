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

//! Query system: iterate every entity across every archetype that owns a
//! fixed set of component types.

use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::archetype::Archetype;
use crate::component::{Component, ComponentId, ComponentSet, MAX_SET_ARITY};
use crate::entity::EntityIndex;
use crate::entity_view::EntityView;
use crate::registry::Registry;

/// A [`ComponentSet`] that can also hand back live `&mut` references to its
/// components inside one archetype slot.
pub trait ComponentFetch: ComponentSet {
    type Item<'a>;

    /// Fetch `Self::Item` for `slot`.
    ///
    /// `'a` is deliberately not tied to `archetype`'s borrow: a `Query`
    /// callback also receives `&mut Registry`, and forcing the fetched
    /// item's lifetime to outlive the archetype borrow would make that
    /// impossible to express safely. The caller (`Query::apply` and
    /// friends) must not use the returned references past the point where
    /// it hands control back to a callback that might mutate these same
    /// columns — exactly the discipline `EntityView` already documents.
    fn fetch<'a>(archetype: &mut Archetype, ids: &[ComponentId], slot: usize) -> Self::Item<'a>;
}

macro_rules! impl_component_fetch {
    ($($T:ident),+) => {
        impl<$($T: Component),+> ComponentFetch for ($($T,)+) {
            type Item<'a> = ($(&'a mut $T,)+);

            #[allow(non_snake_case)]
            fn fetch<'a>(archetype: &mut Archetype, ids: &[ComponentId], slot: usize) -> Self::Item<'a> {
                let mut i = 0;
                // Each `get_component_mut` call borrows and releases `archetype`
                // independently; the raw-pointer round trip is sound because
                // distinct component ids always resolve to distinct,
                // non-overlapping columns.
                ($({
                    let ptr = archetype.get_component_mut::<$T>(ids[i], slot) as *mut $T;
                    i += 1;
                    unsafe { &mut *ptr }
                },)+)
            }
        }
    };
}

impl_component_fetch!(A);
impl_component_fetch!(A, B);
impl_component_fetch!(A, B, C);
impl_component_fetch!(A, B, C, D);
impl_component_fetch!(A, B, C, D, E);
impl_component_fetch!(A, B, C, D, E, F);
impl_component_fetch!(A, B, C, D, E, F, G);
impl_component_fetch!(A, B, C, D, E, F, G, H);

/// A cached set of archetype indices known to contain at least `C`'s
/// components, plus the ids themselves so membership can be re-checked
/// cheaply as archetypes evolve.
///
/// `Send`/`Sync` are not implemented, matching [`Registry`]: a `Query`
/// is only ever driven against the single-threaded registry that built it.
pub struct Query<C: ComponentFetch> {
    ids: SmallVec<[ComponentId; MAX_SET_ARITY]>,
    archetypes: Vec<usize>,
    _marker: PhantomData<C>,
    _not_thread_safe: PhantomData<*const ()>,
}

impl<C: ComponentFetch> Query<C> {
    pub(crate) fn new(ids: SmallVec<[ComponentId; MAX_SET_ARITY]>, archetypes: Vec<usize>) -> Self {
        Self {
            ids,
            archetypes,
            _marker: PhantomData,
            _not_thread_safe: PhantomData,
        }
    }

    /// Re-scan the registry for archetypes matching this query's component
    /// set. Needed after creating archetypes the query should now observe.
    pub fn refresh(&mut self, registry: &Registry) {
        self.archetypes = registry.matching_archetypes(&self.ids);
    }

    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    /// Forward iteration: archetypes in captured order, entities `0..len`.
    ///
    /// Only safe under mutation that never removes the current entity or
    /// deletes an archetype mid-pass; prefer [`Query::revapply`] when the
    /// callback may remove or migrate entities.
    pub fn apply<F>(&self, registry: &mut Registry, mut f: F)
    where
        F: FnMut(&mut Registry, EntityIndex, C::Item<'_>),
    {
        for &arch_idx in &self.archetypes {
            if !registry.archetype(arch_idx).contains_components(&self.ids) {
                continue;
            }
            let len = registry.archetype(arch_idx).len();
            for slot in 0..len {
                let item = C::fetch(registry.archetype_mut(arch_idx), &self.ids, slot);
                f(registry, EntityIndex::new(arch_idx, slot), item);
            }
        }
    }

    /// Reverse iteration: archetypes in reverse captured order, entities
    /// `len-1..0`. Safe even if the callback removes or migrates the entity
    /// it was just handed, since swap-remove only ever pulls in an entity
    /// from a slot index lower than the one currently being visited.
    pub fn revapply<F>(&self, registry: &mut Registry, mut f: F)
    where
        F: FnMut(&mut Registry, EntityIndex, C::Item<'_>),
    {
        for &arch_idx in self.archetypes.iter().rev() {
            if !registry.archetype(arch_idx).contains_components(&self.ids) {
                continue;
            }
            let mut slot = registry.archetype(arch_idx).len();
            while slot > 0 {
                slot -= 1;
                if slot >= registry.archetype(arch_idx).len() {
                    // Already pulled out of existence by an earlier swap-remove this pass.
                    continue;
                }
                let item = C::fetch(registry.archetype_mut(arch_idx), &self.ids, slot);
                f(registry, EntityIndex::new(arch_idx, slot), item);
            }
        }
    }

    /// Forward iteration handing the callback an [`EntityView`] instead of
    /// typed references, for callers that want to address components by id.
    pub fn applyview<F>(&self, registry: &mut Registry, mut f: F)
    where
        F: FnMut(&mut Registry, EntityIndex, EntityView<'_>),
    {
        for &arch_idx in &self.archetypes {
            if !registry.archetype(arch_idx).contains_components(&self.ids) {
                continue;
            }
            let len = registry.archetype(arch_idx).len();
            for slot in 0..len {
                let view = registry.archetype_mut(arch_idx).make_view(slot, &self.ids);
                f(registry, EntityIndex::new(arch_idx, slot), view);
            }
        }
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

    #[test]
    fn apply_visits_every_matching_entity() {
        let mut registry = Registry::new();
        registry.create_entity((Position { x: 0.0, y: 0.0 }, Velocity { dx: 1.0 }));
        registry.create_entity((Position { x: 1.0, y: 1.0 }, Velocity { dx: 2.0 }));
        registry.create_entity((Position { x: 9.0, y: 9.0 },));

        let query = registry.make_query::<(Position, Velocity)>();
        let mut visited = 0;
        query.apply(&mut registry, |_registry, _idx, (pos, vel): (&mut Position, &mut Velocity)| {
            pos.x += vel.dx;
            visited += 1;
        });
        assert_eq!(visited, 2);
    }

    #[test]
    fn revapply_survives_removal_of_current_entity() {
        let mut registry = Registry::new();
        let a = registry.create_entity((Position { x: 0.0, y: 0.0 },));
        registry.create_entity((Position { x: 1.0, y: 0.0 },));
        registry.create_entity((Position { x: 2.0, y: 0.0 },));

        let query = registry.make_query::<(Position,)>();
        let mut seen = Vec::new();
        query.revapply(&mut registry, |registry, idx, (pos,): (&mut Position,)| {
            seen.push(pos.x);
            if pos.x == 1.0 {
                registry.remove_entity(idx).unwrap();
            }
        });

        assert_eq!(seen.len(), 3);
        assert_eq!(*registry.get_component::<Position>(a).unwrap(), Position { x: 0.0, y: 0.0 });
    }

    #[test]
    fn applyview_reaches_components_by_id() {
        let mut registry = Registry::new();
        registry.create_entity((Position { x: 3.0, y: 4.0 },));
        let position_id = registry.components_mut().id_of::<Position>();
        let query = registry.make_query::<(Position,)>();

        let mut found = None;
        query.applyview(&mut registry, |_registry, _idx, view| {
            found = Some(*view.get::<Position>(position_id));
        });

        assert_eq!(found, Some(Position { x: 3.0, y: 4.0 }));
    }

    #[test]
    fn refresh_picks_up_archetypes_created_after_query_build() {
        let mut registry = Registry::new();
        let mut query = registry.make_query::<(Velocity,)>();
        assert_eq!(query.archetype_count(), 0);

        registry.create_entity((Velocity { dx: 1.0 },));
        query.refresh(&registry);
        assert_eq!(query.archetype_count(), 1);
    }
}

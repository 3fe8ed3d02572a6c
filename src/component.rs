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

//! Component identity and Bundle traits
//!
//! Components are plain data attached to entities. Each component type is
//! assigned a dense, one-based [`ComponentId`] the first time it is seen by a
//! [`ComponentRegistry`]; archetype masks and column maps are keyed off that
//! id rather than off `TypeId` directly, so bit `(id - 1)` can stand for the
//! type in a fixed-size bitset.

use std::any::TypeId;

use ahash::AHashMap;
use smallvec::{smallvec, SmallVec};

use crate::archetype::Archetype;

/// Most tuple-based `ComponentSet`/`Bundle` impls go up to this arity.
pub const MAX_SET_ARITY: usize = 8;

/// Marker trait for component types. Components live in archetype columns
/// and must not borrow data, but need not be `Send`/`Sync` — the whole crate
/// is single-threaded by contract (see the crate root docs).
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

/// Dense, one-based id assigned to a registered component type.
///
/// `ComponentId(i)` corresponds to bit `i - 1` in an archetype mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// The bit position this id occupies in a mask (`id - 1`).
    pub fn bit_index(self) -> usize {
        (self.0 - 1) as usize
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    #[cfg(test)]
    pub fn for_test(raw: u32) -> Self {
        ComponentId(raw)
    }
}

/// Assigns and looks up the dense [`ComponentId`] for each component type
/// seen by a particular [`crate::registry::Registry`].
///
/// Ids are not global: two `ComponentRegistry` instances may assign
/// different ids to the same Rust type. This is fine because a `Registry`
/// and every `Archetype`/`Query` it owns always share one registry.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    ids: AHashMap<TypeId, ComponentId>,
    types: Vec<TypeId>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            ids: AHashMap::new(),
            types: Vec::new(),
        }
    }

    /// Returns `T`'s id, assigning a fresh one if `T` has not been seen yet.
    pub fn id_of<T: Component>(&mut self) -> ComponentId {
        let type_id = TypeId::of::<T>();
        if let Some(&id) = self.ids.get(&type_id) {
            return id;
        }
        let id = ComponentId((self.types.len() + 1) as u32);
        self.types.push(type_id);
        self.ids.insert(type_id, id);
        id
    }

    /// Returns `T`'s id without registering it.
    pub fn try_id_of<T: Component>(&self) -> Option<ComponentId> {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// The `TypeId` registered under `id`, if any.
    pub fn type_of(&self, id: ComponentId) -> Option<TypeId> {
        self.types.get(id.bit_index()).copied()
    }

    /// Highest id assigned so far. `0` if nothing has been registered.
    pub fn max_id(&self) -> u32 {
        self.types.len() as u32
    }
}

/// A fixed, compile-time set of component types.
///
/// Implemented for tuples of [`Component`] types up to [`MAX_SET_ARITY`].
/// Used anywhere the crate needs "the ids of these types" without needing
/// values — `remove_components`, `make_query`, `contains_components`.
pub trait ComponentSet {
    fn ids(registry: &mut ComponentRegistry) -> SmallVec<[ComponentId; MAX_SET_ARITY]>;

    /// Allocate a column for each type in this set directly on `archetype`,
    /// reserving `reserve` rows in each. Used for the `extra Ts...` part of
    /// `Archetype::add_types_from`/`add_types`, where the concrete types
    /// (not just their ids) are needed to build the column's destructor.
    fn add_columns(registry: &mut ComponentRegistry, archetype: &mut Archetype, reserve: usize);
}

/// A [`ComponentSet`] paired with actual component values, for spawning and
/// for `emplace_components`.
pub trait Bundle: ComponentSet {
    /// Write every component in `self` into a row that has never held a
    /// live value for these columns (a freshly added or migrated-in row).
    ///
    /// `ids` must be `Self::ids(registry)` computed against the same
    /// registry the archetype's owning `Registry` uses, in the same order
    /// the tuple declares its components.
    fn emplace_into(self, archetype: &mut Archetype, slot: usize, ids: &[ComponentId]);

    /// Overwrite an existing row's values, dropping whatever was there.
    fn assign_into(self, archetype: &mut Archetype, slot: usize, ids: &[ComponentId]);
}

macro_rules! impl_component_set {
    ($($T:ident),+) => {
        impl<$($T: Component),+> ComponentSet for ($($T,)+) {
            fn ids(registry: &mut ComponentRegistry) -> SmallVec<[ComponentId; MAX_SET_ARITY]> {
                smallvec![$(registry.id_of::<$T>()),+]
            }

            fn add_columns(registry: &mut ComponentRegistry, archetype: &mut Archetype, reserve: usize) {
                $(
                    let id = registry.id_of::<$T>();
                    archetype.add_type::<$T>(id, reserve);
                )+
            }
        }
    };
}

macro_rules! impl_bundle {
    ($($T:ident),+) => {
        impl<$($T: Component),+> Bundle for ($($T,)+) {
            #[allow(non_snake_case)]
            fn emplace_into(self, archetype: &mut Archetype, slot: usize, ids: &[ComponentId]) {
                let ($($T,)+) = self;
                let mut i = 0;
                $(
                    archetype.emplace_component(ids[i], slot, $T);
                    i += 1;
                )+
                let _ = i;
            }

            #[allow(non_snake_case)]
            fn assign_into(self, archetype: &mut Archetype, slot: usize, ids: &[ComponentId]) {
                let ($($T,)+) = self;
                let mut i = 0;
                $(
                    archetype.assign_component(ids[i], slot, $T);
                    i += 1;
                )+
                let _ = i;
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);
impl_bundle!(A, B, C, D, E, F);
impl_bundle!(A, B, C, D, E, F, G);
impl_bundle!(A, B, C, D, E, F, G, H);

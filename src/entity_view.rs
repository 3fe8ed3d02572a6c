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

//! Transient, type-erased access to one entity's components.

use smallvec::SmallVec;

use crate::component::{Component, ComponentId};

const INLINE_VIEW_COMPONENTS: usize = 8;

/// A short-lived map from component id to a raw pointer into an archetype
/// column, for callers that want to address components by id rather than
/// by naming a fixed `Ts...` list at the call site.
///
/// Borrows the archetype's column memory: any growth of a referenced column
/// (triggered by `add_entity`/`push_default` on that archetype) invalidates
/// every pointer this view holds. Callers must not add entities to the
/// source archetype while a view over one of its rows is alive.
pub struct EntityView<'a> {
    entries: SmallVec<[(ComponentId, *mut u8); INLINE_VIEW_COMPONENTS]>,
    _marker: std::marker::PhantomData<&'a mut ()>,
}

impl<'a> EntityView<'a> {
    pub(crate) fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            _marker: std::marker::PhantomData,
        }
    }

    pub(crate) fn add_raw(&mut self, id: ComponentId, ptr: *mut u8) {
        self.entries.push((id, ptr));
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.entries.iter().any(|&(entry_id, _)| entry_id == id)
    }

    pub fn contains_type<T: Component>(&self, id: ComponentId) -> bool {
        self.contains(id)
    }

    /// Cast the pointer installed for `id` back to `&mut T`.
    ///
    /// Callers must pass the same `id`/`T` pairing used to build the view;
    /// this has no way to check that `T` matches what was installed.
    pub fn get<T: Component>(&self, id: ComponentId) -> &mut T {
        let (_, ptr) = self
            .entries
            .iter()
            .find(|&&(entry_id, _)| entry_id == id)
            .expect("component id not present in this EntityView");
        unsafe { &mut *(*ptr as *mut T) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_pointer() {
        let mut value: u32 = 42;
        let id = ComponentId::for_test(1);
        let mut view = EntityView::new();
        view.add_raw(id, &mut value as *mut u32 as *mut u8);
        assert!(view.contains(id));
        assert_eq!(*view.get::<u32>(id), 42);
        *view.get::<u32>(id) = 7;
        assert_eq!(value, 7);
    }
}

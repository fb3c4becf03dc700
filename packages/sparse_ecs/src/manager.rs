//! Type-erased ownership of component stores.
//!
//! The registry does not know every component type up front, so each
//! `ComponentStore<T>` is kept behind a `ComponentManager` trait object and
//! recovered by downcasting when the caller names `T`.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};

use log::debug;

use crate::component::{Component, ComponentTypeID};
use crate::entity::EntityID;
use crate::storage::ComponentStore;

/// The capabilities shared by every component store, regardless of type.
pub trait ComponentManager {
    /// Drop the entity's component from this store, if it has one.
    fn remove_entity(&mut self, entity: EntityID);

    /// Return the number of components in this store.
    fn len(&self) -> usize;

    /// Returns true if this store holds no components.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the name of the component type.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

impl<T: 'static> ComponentManager for ComponentStore<T> {
    fn remove_entity(&mut self, entity: EntityID) {
        self.remove_for_entity(entity);
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// A collection of component stores keyed by component type.
///
/// Stores are created on first use and live as long as the collection.
#[derive(Default)]
pub struct ComponentManagers {
    managers: BTreeMap<ComponentTypeID, Box<dyn ComponentManager>>,
}

impl ComponentManagers {
    /// Create an empty collection.
    pub fn new() -> ComponentManagers {
        ComponentManagers {
            managers: BTreeMap::new(),
        }
    }

    /// Fetch the store for `T`, if it has been created.
    pub fn get<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.managers.get(&T::type_id())
            .and_then(|m| m.as_any().downcast_ref())
    }

    /// Fetch the store for `T` mutably, if it has been created.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        self.managers.get_mut(&T::type_id())
            .and_then(|m| m.as_any_mut().downcast_mut())
    }

    /// Fetch the store for `T`, creating it if it does not exist yet.
    pub fn get_or_create<T: Component>(&mut self) -> &mut ComponentStore<T> {
        let type_id = T::type_id();
        let manager = self.managers.entry(type_id).or_insert_with(|| {
            debug!("creating component store for {:?}", type_id);
            Box::new(ComponentStore::<T>::new())
        });

        let existing = manager.type_name();
        match manager.as_any_mut().downcast_mut() {
            Some(store) => store,
            None => panic!("component type ID {:?} is shared by {} and {}",
                           type_id, existing, std::any::type_name::<T>()),
        }
    }

    /// Call `f` on every store, whatever its type.
    pub fn for_each_manager(&mut self, mut f: impl FnMut(&mut dyn ComponentManager)) {
        for manager in self.managers.values_mut() {
            f(manager.as_mut());
        }
    }

    /// Remove an entity's components from every store.
    pub fn remove_entity(&mut self, entity: EntityID) {
        self.for_each_manager(|manager| manager.remove_entity(entity));
    }

    /// Return the number of stores created.
    pub fn len(&self) -> usize {
        self.managers.len()
    }

    /// Returns true if no store has been created.
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

impl Debug for ComponentManagers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.managers.iter().map(|(id, m)| (id, m.len())))
            .finish()
    }
}

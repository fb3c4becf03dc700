//! Typed component storage.
//!
//! A `ComponentStore` is a sparse set: a sparse array maps entity IDs to
//! indices into two packed arrays, one of entity IDs and one of values. This
//! keeps lookup, insertion and removal O(1) whilst keeping the values tightly
//! packed for iteration.

use std::fmt::{self, Debug, Formatter};

use log::trace;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::entity::{EntityID, MAX_ID, RawID};
use crate::error::BindError;

/// Storage for all the components of a single type.
pub struct ComponentStore<T> {
    sparse: Vec<RawID>,
    dense: Vec<EntityID>,
    data: Vec<T>,
}

impl<T> ComponentStore<T> {
    /// Create an empty store.
    pub fn new() -> ComponentStore<T> {
        ComponentStore {
            sparse: Vec::new(),
            dense: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Return the dense index for an entity, if it has a value.
    fn dense_index(&self, entity: EntityID) -> Option<usize> {
        match self.sparse.get(entity.index()) {
            Some(&idx) if idx != MAX_ID => Some(idx as usize),
            _ => None,
        }
    }

    /// Returns true if the entity has a value in this store.
    pub fn has(&self, entity: EntityID) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Get the value for an entity.
    ///
    /// The reference is invalidated by the next `bind` or `unbind`, which
    /// the borrow checker enforces.
    pub fn get(&self, entity: EntityID) -> Option<&T> {
        self.dense_index(entity).map(|idx| &self.data[idx])
    }

    /// Get a mutable reference to the value for an entity.
    pub fn get_mut(&mut self, entity: EntityID) -> Option<&mut T> {
        match self.dense_index(entity) {
            Some(idx) => Some(&mut self.data[idx]),
            None => None,
        }
    }

    /// Associate a value with an entity.
    ///
    /// If the entity already has a value it is dropped and replaced by one
    /// freshly constructed from `value`.
    pub fn bind(&mut self, entity: EntityID, value: impl Into<T>) -> Result<(), BindError> {
        if entity.is_null() {
            return Err(BindError::InvalidKey);
        }

        let key = entity.index();
        if key >= self.sparse.len() {
            // Only the new tail is filled, existing mappings stay put.
            self.sparse.resize(key + 1, MAX_ID);
        }

        let value = value.into();
        match self.dense_index(entity) {
            Some(idx) => self.data[idx] = value,
            None => {
                self.sparse[key] = self.dense.len() as RawID;
                self.dense.push(entity);
                self.data.push(value);
            }
        }

        Ok(())
    }

    /// Remove the value associated with an entity, returning it.
    ///
    /// This swaps the last value into the vacated slot, so the packed order
    /// is not preserved.
    pub fn unbind(&mut self, entity: EntityID) -> Option<T> {
        let idx = self.dense_index(entity)?;

        let last = *self.dense.last()?;
        self.sparse[last.index()] = idx as RawID;
        self.sparse[entity.index()] = MAX_ID;

        self.dense.swap_remove(idx);
        let value = self.data.swap_remove(idx);
        trace!("unbound {:?} from dense slot {}", entity, idx);
        Some(value)
    }

    /// Remove and drop the value for an entity, if any.
    pub fn remove_for_entity(&mut self, entity: EntityID) {
        self.unbind(entity);
    }

    /// Return the number of values stored.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns true if this store contains no values.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Return the packed list of entities which have values.
    ///
    /// This is in the same order as `values()`, not sorted.
    pub fn entities(&self) -> &[EntityID] {
        &self.dense
    }

    /// Return the packed list of values.
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Iterate over all entities and their values in packed order.
    pub fn iter(&self) -> ComponentIter<'_, T> {
        ComponentIter::new(&self.dense, &self.data)
    }

    /// Iterate over all entities and their values in parallel.
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item=(EntityID, &T)>
        where T: Sync
    {
        self.dense.par_iter()
            .copied()
            .zip(self.data.par_iter())
    }
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        ComponentStore::new()
    }
}

impl<T> Debug for ComponentStore<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<ComponentStore<{}> {} values>", std::any::type_name::<T>(), self.len())
    }
}

impl<'a, T> IntoIterator for &'a ComponentStore<T> {
    type Item = (EntityID, &'a T);
    type IntoIter = ComponentIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entities and values in a `ComponentStore`.
pub struct ComponentIter<'a, T> {
    entities: &'a [EntityID],
    values: &'a [T],
    front: usize,
    back: usize,
}

impl<'a, T> ComponentIter<'a, T> {
    fn new(entities: &'a [EntityID], values: &'a [T]) -> ComponentIter<'a, T> {
        ComponentIter {
            entities,
            values,
            front: 0,
            back: values.len(),
        }
    }
}

impl<'a, T> Iterator for ComponentIter<'a, T> {
    type Item = (EntityID, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        let idx = self.front;
        self.front += 1;
        Some((self.entities[idx], &self.values[idx]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for ComponentIter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        self.back -= 1;
        Some((self.entities[self.back], &self.values[self.back]))
    }
}

impl<'a, T> ExactSizeIterator for ComponentIter<'a, T> {}

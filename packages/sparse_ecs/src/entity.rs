//! Entity identifiers and their allocation.
//!
//! Entities carry no data of their own, they are just a number. Dead numbers
//! are recycled through an implicit free list threaded through the slot array,
//! so no extra allocation is needed to track them.

use std::fmt::{self, Debug, Formatter};

use log::trace;

/// The raw integer type backing an `EntityID`.
#[cfg(not(feature = "wide-id"))]
pub type RawID = u32;

/// The raw integer type backing an `EntityID`.
#[cfg(feature = "wide-id")]
pub type RawID = u64;

/// The reserved null identifier. It is never issued to a live entity.
pub const MAX_ID: RawID = RawID::MAX;

/// The ID of a single entity.
///
/// Entity IDs are unique per `Registry` amongst live entities. Once an entity
/// is killed its ID may be handed out again.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityID(RawID);

impl EntityID {
    /// The null entity.
    pub const NULL: EntityID = EntityID(MAX_ID);

    /// Create a new EntityID given the inner unique ID.
    pub const fn new(id: RawID) -> EntityID {
        EntityID(id)
    }

    /// Return the inner unique ID.
    pub fn id(&self) -> RawID {
        self.0
    }

    /// Return the ID as an index into slot arrays.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns true if this is the null entity.
    pub fn is_null(&self) -> bool {
        self.0 == MAX_ID
    }
}

impl Debug for EntityID {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "EntityID(null)")
        } else {
            write!(f, "EntityID({})", self.0)
        }
    }
}

impl From<RawID> for EntityID {
    fn from(id: RawID) -> Self {
        EntityID(id)
    }
}

/// Issues and recycles `EntityID`s.
///
/// Slot `i` holds `i` while entity `i` is alive. A dead slot holds the entity
/// which was killed before it (or `MAX_ID`), forming a LIFO free list whose
/// head is `last_freed`.
#[derive(Clone)]
pub struct EntityAllocator {
    last_freed: RawID,
    slots: Vec<RawID>,
}

impl EntityAllocator {
    /// Create an empty allocator.
    pub fn new() -> EntityAllocator {
        EntityAllocator::with_capacity(0)
    }

    /// Create an empty allocator with room for `capacity` entities before
    /// reallocating.
    pub fn with_capacity(capacity: usize) -> EntityAllocator {
        EntityAllocator {
            last_freed: MAX_ID,
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Allocate an entity, preferring the most recently killed one.
    ///
    /// Panics if every identifier below `MAX_ID` is in use.
    pub fn create(&mut self) -> EntityID {
        if self.last_freed == MAX_ID {
            self.create_new()
        } else {
            self.recycle()
        }
    }

    fn create_new(&mut self) -> EntityID {
        let id = self.slots.len();
        assert!(id < MAX_ID as usize, "entity id space exhausted");

        let id = id as RawID;
        self.slots.push(id);
        trace!("created entity {}", id);
        EntityID(id)
    }

    fn recycle(&mut self) -> EntityID {
        let id = self.last_freed;
        let slot = &mut self.slots[id as usize];
        self.last_freed = *slot;
        *slot = id;
        trace!("recycled entity {}", id);
        EntityID(id)
    }

    /// Returns true if the entity is currently alive.
    pub fn is_alive(&self, entity: EntityID) -> bool {
        self.slots.get(entity.index())
            .map_or(false, |slot| *slot == entity.0)
    }

    /// Mark an entity as dead, pushing it onto the free list.
    ///
    /// Returns false if the entity was not alive.
    pub fn kill(&mut self, entity: EntityID) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        self.slots[entity.index()] = self.last_freed;
        self.last_freed = entity.0;
        trace!("killed entity {}", entity.0);
        true
    }

    /// Return the number of slots ever allocated, alive or dead.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no entity has ever been allocated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Return the number of live entities.
    pub fn alive_count(&self) -> usize {
        self.iter_alive().count()
    }

    /// Iterate over all live entities in ascending order.
    pub fn iter_alive(&self) -> impl Iterator<Item=EntityID> + '_ {
        self.slots.iter()
            .enumerate()
            .filter(|(idx, slot)| **slot as usize == *idx)
            .map(|(_, slot)| EntityID(*slot))
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        EntityAllocator::new()
    }
}

impl Debug for EntityAllocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityAllocator")
            .field("slots", &self.slots.len())
            .field("alive", &self.alive_count())
            .finish()
    }
}

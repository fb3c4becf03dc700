//! The registry owns every entity and component.
//!
//! This is the main entry point of the crate: entities are created and killed
//! here, components are bound to them here, and queries run here.

use log::trace;

use crate::component::Component;
use crate::component_list::ComponentList;
use crate::entity::{EntityAllocator, EntityID};
use crate::error::BindError;
use crate::manager::ComponentManagers;
use crate::sorted;
use crate::storage::ComponentStore;

/// Manages entities and their components.
///
/// ```
/// use sparse_ecs::{component, Registry};
///
/// #[derive(Debug, PartialEq)]
/// struct Position(i32, i32);
/// component!(Position);
///
/// let mut registry = Registry::new();
/// let entity = registry.create_entity();
/// registry.bind::<Position>(entity, Position(1, 2)).unwrap();
/// assert_eq!(registry.get_component::<Position>(entity), Some(&Position(1, 2)));
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    entities: EntityAllocator,
    managers: ComponentManagers,
}

/// The result of a query: each matching entity with references to its
/// components, in ascending entity order.
pub type QueryResult<'a, L> = Vec<(EntityID, <L as ComponentList>::Refs<'a>)>;

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Registry {
        Registry::with_capacity(0)
    }

    /// Create an empty registry with room for `capacity` entities.
    pub fn with_capacity(capacity: usize) -> Registry {
        Registry {
            entities: EntityAllocator::with_capacity(capacity),
            managers: ComponentManagers::new(),
        }
    }

    /// Create a new entity with no components.
    ///
    /// The most recently killed entity is reused if there is one.
    pub fn create_entity(&mut self) -> EntityID {
        self.entities.create()
    }

    /// Returns true if the entity is alive.
    pub fn is_alive(&self, entity: EntityID) -> bool {
        self.entities.is_alive(entity)
    }

    /// Kill an entity, dropping all of its components.
    ///
    /// Returns false, and does nothing, if the entity was not alive.
    pub fn kill_entity(&mut self, entity: EntityID) -> bool {
        if !self.entities.kill(entity) {
            return false;
        }

        self.managers.remove_entity(entity);
        true
    }

    /// Return the number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Iterate over all live entities in ascending order.
    pub fn iter_entities(&self) -> impl Iterator<Item=EntityID> + '_ {
        self.entities.iter_alive()
    }

    /// Return the number of component types which have been bound at least once.
    pub fn component_type_count(&self) -> usize {
        self.managers.len()
    }

    /// Get the store of all `T` components, if any have ever been bound.
    pub fn storage<T: Component>(&self) -> Option<&ComponentStore<T>> {
        self.managers.get::<T>()
    }

    /// Returns true if the entity has a `T` component.
    pub fn has_component<T: Component>(&self, entity: EntityID) -> bool {
        self.managers.get::<T>().map_or(false, |s| s.has(entity))
    }

    /// Get the entity's `T` component.
    pub fn get_component<T: Component>(&self, entity: EntityID) -> Option<&T> {
        self.managers.get::<T>().and_then(|s| s.get(entity))
    }

    /// Get the entity's `T` component mutably.
    pub fn get_component_mut<T: Component>(&mut self, entity: EntityID) -> Option<&mut T> {
        self.managers.get_mut::<T>().and_then(|s| s.get_mut(entity))
    }

    /// Attach a `T` component to a live entity.
    ///
    /// If the entity already has a `T` it is replaced by a new value built
    /// from `value`.
    pub fn bind<T: Component>(&mut self, entity: EntityID, value: impl Into<T>) -> Result<(), BindError> {
        if entity.is_null() {
            return Err(BindError::InvalidKey);
        }

        if !self.is_alive(entity) {
            return Err(BindError::DeadEntity);
        }

        self.managers.get_or_create::<T>().bind(entity, value)
    }

    /// Detach the entity's `T` component, returning it.
    pub fn unbind<T: Component>(&mut self, entity: EntityID) -> Option<T> {
        self.managers.get_mut::<T>().and_then(|s| s.unbind(entity))
    }

    /// List all entities with a `T` component, in ascending order.
    pub fn entities_with_component<T: Component>(&self) -> Vec<EntityID> {
        self.entities_with_all::<(T,)>()
    }

    /// Get several components of one entity at once.
    ///
    /// Each lookup is independent: a missing component does not prevent the
    /// others being returned.
    pub fn get_components<L: ComponentList>(&self, entity: EntityID) -> L::OptionRefs<'_> {
        L::get_each(L::stores(&self.managers), entity)
    }

    /// Find every entity which has all of the `With` components and none of
    /// the `Without` components.
    ///
    /// An empty `With` list matches nothing.
    pub fn query<With, Without>(&self) -> QueryResult<'_, With>
        where With: ComponentList,
              Without: ComponentList,
    {
        let with = self.entities_with_all::<With>();
        let without = self.entities_with_any::<Without>();
        let matched = sorted::difference(&with, &without);
        trace!("query matched {} of {} entities ({} excluded)",
               matched.len(), with.len(), without.len());

        let stores = With::stores(&self.managers);
        matched.into_iter()
            .filter_map(|entity| With::get_all(stores, entity).map(|refs| (entity, refs)))
            .collect()
    }

    /// List all live entities which have every component in `L`.
    fn entities_with_all<L: ComponentList>(&self) -> Vec<EntityID> {
        if L::LEN == 0 {
            return Vec::new();
        }

        let stores = L::stores(&self.managers);
        self.entities.iter_alive()
            .filter(|e| L::has_all(stores, *e))
            .collect()
    }

    /// List all live entities which have any component in `L`.
    fn entities_with_any<L: ComponentList>(&self) -> Vec<EntityID> {
        if L::LEN == 0 {
            return Vec::new();
        }

        let stores = L::stores(&self.managers);
        self.entities.iter_alive()
            .filter(|e| L::has_any(stores, *e))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::component;
    use crate::entity::{MAX_ID, RawID};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Vec2 {
        x: i8,
        y: i8,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Vec3 {
        x: i8,
        y: i8,
        z: i8,
    }

    impl From<(i8, i8)> for Vec2 {
        fn from((x, y): (i8, i8)) -> Self {
            Vec2 { x, y }
        }
    }

    impl From<(i8, i8, i8)> for Vec3 {
        fn from((x, y, z): (i8, i8, i8)) -> Self {
            Vec3 { x, y, z }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Tag(u32);
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Marker(char);
    struct Unused;

    component!(Vec2, Vec3, Tag, Marker, Unused);

    #[test]
    fn test_create_entity() {
        let mut registry = Registry::new();

        assert_eq!(registry.create_entity(), EntityID::new(0));
        assert_eq!(registry.create_entity(), EntityID::new(1));
        assert_eq!(registry.create_entity(), EntityID::new(2));
        assert_eq!(registry.entity_count(), 3);
    }

    #[test]
    fn test_fresh_entity_is_empty() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        registry.bind::<Vec2>(e0, (1, 2)).unwrap();
        registry.kill_entity(e0);

        let e1 = registry.create_entity();
        assert_eq!(e0, e1);
        assert!(registry.is_alive(e1));
        assert!(!registry.has_component::<Vec2>(e1));
    }

    #[test]
    fn test_bind() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();

        assert_eq!(registry.bind::<Tag>(e0, Tag(5)), Ok(()));
        assert_eq!(registry.bind::<Vec2>(e0, (0, 1)), Ok(()));
        assert_eq!(registry.component_type_count(), 2);
    }

    #[test]
    fn test_bind_errors() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();

        assert_eq!(registry.bind::<Tag>(EntityID::NULL, Tag(0)), Err(BindError::InvalidKey));
        assert_eq!(registry.bind::<Tag>(EntityID::new(MAX_ID), Tag(0)), Err(BindError::InvalidKey));
        assert_eq!(registry.bind::<Tag>(EntityID::new(7), Tag(0)), Err(BindError::DeadEntity));

        registry.kill_entity(e0);
        assert_eq!(registry.bind::<Tag>(e0, Tag(0)), Err(BindError::DeadEntity));

        // Failed binds must not create stores.
        assert_eq!(registry.component_type_count(), 0);
    }

    #[test]
    fn test_get_component() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.bind::<Vec2>(e0, (0, 1)).unwrap();
        registry.bind::<Vec2>(e1, (1, 1)).unwrap();
        registry.bind::<Vec3>(e1, (1, 2, 3)).unwrap();

        assert_eq!(registry.get_component::<Vec2>(e0), Some(&Vec2 { x: 0, y: 1 }));
        assert_eq!(registry.get_component::<Vec2>(e1), Some(&Vec2 { x: 1, y: 1 }));
        assert_eq!(registry.get_component::<Vec3>(e1), Some(&Vec3 { x: 1, y: 2, z: 3 }));
        assert_eq!(registry.get_component::<Vec3>(e0), None);
    }

    #[test]
    fn test_update_component() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();

        registry.bind::<Vec2>(e0, (0, 1)).unwrap();
        assert_eq!(registry.get_component::<Vec2>(e0), Some(&Vec2 { x: 0, y: 1 }));

        registry.bind::<Vec2>(e0, (1, 1)).unwrap();
        assert_eq!(registry.get_component::<Vec2>(e0), Some(&Vec2 { x: 1, y: 1 }));
        assert_eq!(registry.storage::<Vec2>().unwrap().len(), 1);
    }

    #[test]
    fn test_get_component_mut() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        registry.bind::<Tag>(e0, Tag(1)).unwrap();

        registry.get_component_mut::<Tag>(e0).unwrap().0 = 9;
        assert_eq!(registry.get_component::<Tag>(e0), Some(&Tag(9)));
        assert!(registry.get_component_mut::<Vec2>(e0).is_none());
    }

    #[test]
    fn test_entities_with_component() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.bind::<Vec2>(e0, (0, 0)).unwrap();
        registry.bind::<Vec2>(e1, (1, 1)).unwrap();
        registry.bind::<Vec3>(e1, (3, 3, 3)).unwrap();

        assert_eq!(registry.entities_with_component::<Vec2>(), vec![e0, e1]);
        assert_eq!(registry.entities_with_component::<Vec3>(), vec![e1]);
        assert_eq!(registry.entities_with_component::<Tag>(), Vec::<EntityID>::new());
    }

    #[test]
    fn test_entities_with_component_sorted_after_churn() {
        let mut registry = Registry::new();
        let e: Vec<_> = (0..6).map(|_| registry.create_entity()).collect();
        for entity in &e {
            registry.bind::<Tag>(*entity, Tag(entity.id() as u32)).unwrap();
        }

        registry.kill_entity(e[4]);
        registry.kill_entity(e[1]);
        registry.kill_entity(e[3]);

        // Recycles 3, then 1.
        let r0 = registry.create_entity();
        let r1 = registry.create_entity();
        registry.bind::<Tag>(r1, Tag(100)).unwrap();
        registry.bind::<Tag>(r0, Tag(101)).unwrap();

        assert_eq!(registry.entities_with_component::<Tag>(), vec![e[0], e[1], e[2], e[3], e[5]]);
    }

    #[test]
    fn test_unbind() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.bind::<Vec2>(e0, (0, 0)).unwrap();
        registry.bind::<Vec3>(e0, (3, 3, 3)).unwrap();

        assert_eq!(registry.unbind::<Vec2>(e0), Some(Vec2 { x: 0, y: 0 }));
        assert_eq!(registry.unbind::<Vec3>(e0), Some(Vec3 { x: 3, y: 3, z: 3 }));
        assert_eq!(registry.unbind::<Vec2>(e0), None);
        assert_eq!(registry.unbind::<Vec2>(e1), None);
        assert_eq!(registry.unbind::<Tag>(e1), None);
    }

    #[test]
    fn test_has_component() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.bind::<Vec2>(e0, (0, 0)).unwrap();
        registry.bind::<Vec3>(e1, (3, 3, 3)).unwrap();

        assert!(registry.has_component::<Vec2>(e0));
        assert!(registry.has_component::<Vec3>(e1));
        assert!(!registry.has_component::<Vec3>(e0));
        assert!(!registry.has_component::<Tag>(e0));
    }

    #[test]
    fn test_kill_entity() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.bind::<Vec2>(e0, (1, 2)).unwrap();
        registry.bind::<Vec3>(e0, (3, 4, 5)).unwrap();
        registry.bind::<Vec2>(e1, (6, 7)).unwrap();

        assert!(registry.kill_entity(e0));

        assert_eq!(registry.get_component::<Vec2>(e0), None);
        assert_eq!(registry.get_component::<Vec3>(e0), None);
        assert!(!registry.is_alive(e0));
        assert_eq!(registry.get_component::<Vec2>(e1), Some(&Vec2 { x: 6, y: 7 }));
        assert!(!registry.kill_entity(e0));
    }

    #[test]
    fn test_double_kill_is_noop() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        assert!(registry.kill_entity(e0));
        assert!(!registry.kill_entity(e0));

        let recycled = registry.create_entity();
        assert_eq!(recycled, e0);
        registry.bind::<Tag>(recycled, Tag(1)).unwrap();

        // The free list must hold e0 only once.
        assert_eq!(registry.create_entity(), EntityID::new(2));
        assert_eq!(registry.get_component::<Tag>(recycled), Some(&Tag(1)));
        assert!(registry.is_alive(e1));
    }

    #[test]
    fn test_recycle_entity() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();
        let e2 = registry.create_entity();
        let e3 = registry.create_entity();

        registry.kill_entity(e2);
        registry.kill_entity(e0);
        registry.kill_entity(e1);
        registry.kill_entity(e3);
        assert_eq!(registry.entity_count(), 0);

        assert_eq!(registry.create_entity(), e3);
        assert_eq!(registry.create_entity(), e1);
        assert_eq!(registry.create_entity(), e0);
        assert_eq!(registry.create_entity(), e2);
    }

    #[test]
    fn test_get_components() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.bind::<Tag>(e0, Tag(0)).unwrap();
        registry.bind::<Tag>(e1, Tag(1)).unwrap();
        registry.bind::<Vec2>(e0, (0, 2)).unwrap();

        let (tag, vec2) = registry.get_components::<(Tag, Vec2)>(e0);
        assert_eq!(tag, Some(&Tag(0)));
        assert_eq!(vec2, Some(&Vec2 { x: 0, y: 2 }));

        let (tag, vec2) = registry.get_components::<(Tag, Vec2)>(e1);
        assert_eq!(tag, Some(&Tag(1)));
        assert_eq!(vec2, None);

        let (vec3, tag) = registry.get_components::<(Vec3, Tag)>(e1);
        assert_eq!(vec3, None);
        assert_eq!(tag, Some(&Tag(1)));

        assert_eq!(registry.get_components::<()>(e0), ());
    }

    #[test]
    fn test_query() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.bind::<Tag>(e0, Tag(0)).unwrap();
        registry.bind::<Tag>(e1, Tag(1)).unwrap();
        registry.bind::<Vec2>(e0, (0, 2)).unwrap();
        registry.bind::<Vec2>(e1, (1, 3)).unwrap();
        registry.bind::<Marker>(e0, Marker('a')).unwrap();

        let with = registry.query::<(Tag, Vec2), ()>();
        assert_eq!(with, vec![
            (e0, (&Tag(0), &Vec2 { x: 0, y: 2 })),
            (e1, (&Tag(1), &Vec2 { x: 1, y: 3 })),
        ]);

        let without = registry.query::<(Tag, Vec2), (Marker,)>();
        assert_eq!(without, vec![(e1, (&Tag(1), &Vec2 { x: 1, y: 3 }))]);

        assert!(registry.query::<(), ()>().is_empty());
        assert!(registry.query::<(), (Marker,)>().is_empty());
    }

    #[test]
    fn test_query_include_exclude() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        let e1 = registry.create_entity();

        registry.bind::<Vec2>(e0, (0, 0)).unwrap();
        registry.bind::<Vec3>(e0, (0, 0, 0)).unwrap();
        registry.bind::<Vec2>(e1, (1, 1)).unwrap();
        registry.bind::<Tag>(e1, Tag(1)).unwrap();

        let both: Vec<_> = registry.query::<(Vec2, Vec3), ()>()
            .into_iter().map(|(e, _)| e).collect();
        assert_eq!(both, vec![e0]);

        let only: Vec<_> = registry.query::<(Vec2,), (Vec3,)>()
            .into_iter().map(|(e, _)| e).collect();
        assert_eq!(only, vec![e1]);

        // Excluding any one of several types is enough.
        let none = registry.query::<(Vec2,), (Vec3, Tag)>();
        assert!(none.is_empty());

        // Excluding a type nobody has changes nothing.
        let all: Vec<_> = registry.query::<(Vec2,), (Unused,)>()
            .into_iter().map(|(e, _)| e).collect();
        assert_eq!(all, vec![e0, e1]);
    }

    #[test]
    fn test_query_skips_dead() {
        let mut registry = Registry::new();
        let e: Vec<_> = (0..5).map(|_| registry.create_entity()).collect();
        for entity in &e {
            registry.bind::<Tag>(*entity, Tag(entity.id() as u32)).unwrap();
        }
        registry.kill_entity(e[2]);

        let tags: Vec<_> = registry.query::<(Tag,), ()>()
            .into_iter().map(|(_, (tag,))| tag.0).collect();
        assert_eq!(tags, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_unused_type_never_creates_store() {
        let mut registry = Registry::new();
        let e0 = registry.create_entity();
        registry.bind::<Tag>(e0, Tag(0)).unwrap();

        assert!(!registry.has_component::<Unused>(e0));
        assert!(!registry.has_component::<Unused>(EntityID::new(42 as RawID)));
        assert!(registry.entities_with_component::<Unused>().is_empty());
        assert!(registry.get_component::<Unused>(e0).is_none());
        assert!(registry.unbind::<Unused>(e0).is_none());
        assert!(registry.query::<(Unused,), ()>().is_empty());
        assert!(registry.storage::<Unused>().is_none());
        assert_eq!(registry.component_type_count(), 1);
    }

    #[test]
    fn test_with_capacity() {
        let mut registry = Registry::with_capacity(128);
        assert_eq!(registry.entity_count(), 0);
        let e0 = registry.create_entity();
        assert_eq!(e0, EntityID::new(0));
        assert_eq!(registry.iter_entities().collect::<Vec<_>>(), vec![e0]);
    }
}

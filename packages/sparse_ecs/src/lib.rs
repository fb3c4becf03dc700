//! An entity component store built on sparse sets.
//!
//! Entities are plain IDs handed out by a `Registry`. Each component type
//! gets its own packed `ComponentStore`, created the first time a value of
//! that type is bound, and queries combine stores to find entities with (or
//! without) a set of components.

pub use component::{
    Component,
    ComponentTypeID,
};
pub use component_list::ComponentList;
pub use entity::{EntityID, MAX_ID, RawID};
pub use error::BindError;
pub use manager::{ComponentManager, ComponentManagers};
pub use registry::{QueryResult, Registry};
pub use storage::{ComponentIter, ComponentStore};

pub mod component;
pub mod component_list;
pub mod entity;
pub mod error;
pub mod manager;
pub mod storage;

pub mod registry;

mod sorted;

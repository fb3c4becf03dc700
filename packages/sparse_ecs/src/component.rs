//! Base definitions for components.
//!
//! Components are the data attached to entities. Any `'static` type can be a
//! component once it has been given a unique `ComponentTypeID`, which is what
//! the `component` macro does.

use std::fmt::{self, Debug, Formatter};
use std::sync::{PoisonError, RwLock};

use once_cell::sync::{Lazy, OnceCell};

/// A component type ID which is unique for a specific component type.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentTypeID(usize);

struct ComponentRegistry {
    names: Vec<&'static str>,
}

static COMPONENT_REGISTRY: Lazy<RwLock<ComponentRegistry>> = Lazy::new(|| {
    RwLock::new(ComponentRegistry {
        names: Vec::new(),
    })
});

impl ComponentTypeID {
    /// Create a new globally unique `ComponentTypeID` for `T`.
    ///
    /// Calling this twice for the same type yields two distinct IDs, use
    /// `AutoComponentTypeID` to cache the result.
    pub fn register<T: 'static>() -> ComponentTypeID {
        let mut r = COMPONENT_REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
        let id = ComponentTypeID(r.names.len());
        r.names.push(std::any::type_name::<T>());
        id
    }

    /// Return the inner unique ID.
    pub fn id(&self) -> usize {
        self.0
    }

    /// Return the name of the type registered under this ID.
    pub fn name(&self) -> Option<&'static str> {
        let r = COMPONENT_REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
        r.names.get(self.0).copied()
    }
}

impl Debug for ComponentTypeID {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "ComponentTypeID(#{} missing)", self.0),
        }
    }
}

/// A struct for lazily assigning unique `ComponentTypeID`s.
pub struct AutoComponentTypeID(OnceCell<ComponentTypeID>);

impl AutoComponentTypeID {
    /// Create a new `AutoComponentTypeID`.
    pub const fn new() -> AutoComponentTypeID {
        AutoComponentTypeID(OnceCell::new())
    }

    /// Get the `ComponentTypeID` this struct wraps.
    pub fn get<T: 'static>(&self) -> ComponentTypeID {
        *self.0.get_or_init(ComponentTypeID::register::<T>)
    }
}

impl Default for AutoComponentTypeID {
    fn default() -> Self {
        AutoComponentTypeID::new()
    }
}

/// The component trait is implemented on all component types.
///
/// `type_id` must return the same ID on every call, and no two types may
/// share an ID. The `component` macro takes care of both.
pub trait Component: 'static {
    /// Get the unique type ID of this component.
    fn type_id() -> ComponentTypeID;
}

/// Implement the `Component` trait on a type.
#[macro_export]
macro_rules! component {
    ($($i:ident),+ $(,)?) => {
        $(
            const _: () = {
                static INIT_TYPE: $crate::component::AutoComponentTypeID = $crate::component::AutoComponentTypeID::new();

                impl $crate::component::Component for $i {
                    fn type_id() -> $crate::component::ComponentTypeID {
                        INIT_TYPE.get::<$i>()
                    }
                }
            };
        )+
    };
}

//! Lists of component types, used to fetch or query several components at once.
//!
//! A `ComponentList` is a tuple of component types such as `(Position, Velocity)`.
//! The unit type `()` is the empty list.

use crate::component::Component;
use crate::entity::EntityID;
use crate::manager::ComponentManagers;
use crate::storage::ComponentStore;

/// A tuple of component types.
///
/// Stores are resolved once per operation (`stores`) and then probed per
/// entity, so a query does not look up a store for every entity it visits.
pub trait ComponentList {
    /// The number of component types in the list.
    const LEN: usize;

    /// The resolved store for each type, `None` if it was never created.
    type Stores<'a>: Copy;

    /// A reference to each component.
    type Refs<'a>;

    /// An optional reference to each component.
    type OptionRefs<'a>;

    /// Resolve the store for each type in the list.
    fn stores(managers: &ComponentManagers) -> Self::Stores<'_>;

    /// Returns true if the entity has every component in the list.
    ///
    /// This is vacuously true for the empty list.
    fn has_all(stores: Self::Stores<'_>, entity: EntityID) -> bool;

    /// Returns true if the entity has at least one component in the list.
    fn has_any(stores: Self::Stores<'_>, entity: EntityID) -> bool;

    /// Look up each component independently.
    fn get_each(stores: Self::Stores<'_>, entity: EntityID) -> Self::OptionRefs<'_>;

    /// Look up every component, returning `None` if any is missing.
    fn get_all(stores: Self::Stores<'_>, entity: EntityID) -> Option<Self::Refs<'_>>;
}

impl ComponentList for () {
    const LEN: usize = 0;

    type Stores<'a> = ();
    type Refs<'a> = ();
    type OptionRefs<'a> = ();

    fn stores(_managers: &ComponentManagers) -> Self::Stores<'_> {}

    fn has_all(_stores: Self::Stores<'_>, _entity: EntityID) -> bool {
        true
    }

    fn has_any(_stores: Self::Stores<'_>, _entity: EntityID) -> bool {
        false
    }

    fn get_each(_stores: Self::Stores<'_>, _entity: EntityID) -> Self::OptionRefs<'_> {}

    fn get_all(_stores: Self::Stores<'_>, _entity: EntityID) -> Option<Self::Refs<'_>> {
        Some(())
    }
}

macro_rules! impl_component_list {
    ($($t:ident),+) => {
        #[allow(non_snake_case)]
        impl<$($t: Component),+> ComponentList for ($($t,)+) {
            const LEN: usize = [$(stringify!($t)),+].len();

            type Stores<'a> = ($(Option<&'a ComponentStore<$t>>,)+);
            type Refs<'a> = ($(&'a $t,)+);
            type OptionRefs<'a> = ($(Option<&'a $t>,)+);

            fn stores(managers: &ComponentManagers) -> Self::Stores<'_> {
                ($(managers.get::<$t>(),)+)
            }

            fn has_all(stores: Self::Stores<'_>, entity: EntityID) -> bool {
                let ($($t,)+) = stores;
                $($t.map_or(false, |s| s.has(entity)))&&+
            }

            fn has_any(stores: Self::Stores<'_>, entity: EntityID) -> bool {
                let ($($t,)+) = stores;
                $($t.map_or(false, |s| s.has(entity)))||+
            }

            fn get_each(stores: Self::Stores<'_>, entity: EntityID) -> Self::OptionRefs<'_> {
                let ($($t,)+) = stores;
                ($($t.and_then(|s| s.get(entity)),)+)
            }

            fn get_all(stores: Self::Stores<'_>, entity: EntityID) -> Option<Self::Refs<'_>> {
                let ($($t,)+) = stores;
                Some(($($t?.get(entity)?,)+))
            }
        }
    };
}

impl_component_list!(A);
impl_component_list!(A, B);
impl_component_list!(A, B, C);
impl_component_list!(A, B, C, D);
impl_component_list!(A, B, C, D, E);
impl_component_list!(A, B, C, D, E, F);
impl_component_list!(A, B, C, D, E, F, G);
impl_component_list!(A, B, C, D, E, F, G, H);

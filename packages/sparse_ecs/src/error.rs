//! Errors returned when attaching components.

use thiserror::Error;

/// Reasons a component could not be bound to an entity.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindError {
    /// The key was the null entity (`MAX_ID`).
    #[error("key must be less than MAX_ID")]
    InvalidKey,

    /// The entity is not alive.
    #[error("entity must be alive")]
    DeadEntity,
}

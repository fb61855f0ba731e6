//! Failure kinds shared by every container in the crate.

use thiserror::Error;

/// The ways a container operation can fail.
///
/// Each kind carries no payload.  A failed operation never mutates the
/// container, so it is safe to keep using it after an `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Error {
    /// An index or key lies outside the container's current contents.
    #[error("index out of bound")]
    IndexOutOfBound,

    /// A position is stale, belongs to another container, or was moved past
    /// either end.
    #[error("invalid iterator")]
    InvalidIterator,

    /// The operation needs at least one element.
    #[error("container is empty")]
    ContainerIsEmpty,
}

/// Shorthand for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

//! Errors raised by graph operations

use thiserror::Error;

/// Failure of a graph operation, generic over the publication's own error type.
///
/// The first four variants are precondition failures detected before anything
/// is mutated. `Publication` carries a failure surfaced by the element type; it
/// is only returned after the graph has been restored to its prior state.
#[derive(Debug, Error)]
pub enum GraphError<E> {
    #[error("publication not found")]
    NotFound,

    #[error("publication already created")]
    AlreadyExists,

    #[error("tried to remove the root publication")]
    CannotRemoveRoot,

    #[error("a publication must cite at least one parent")]
    NoParents,

    #[error(transparent)]
    Publication(#[from] E),
}

impl<E> GraphError<E> {
    /// Whether this failure came from the element type rather than a precondition.
    pub fn is_propagated(&self) -> bool {
        matches!(self, GraphError::Publication(_))
    }
}

pub type Result<T, E> = std::result::Result<T, GraphError<E>>;

//! The element type stored in a citation graph

use std::cmp::Ordering;
use std::fmt;

/// A publication the graph can hold.
///
/// Every operation is fallible: construction, identifier retrieval and
/// identifier comparison may all return `Self::Error`, and the graph keeps its
/// invariants whichever of them fails. Publications that cannot fail use
/// [`std::convert::Infallible`] as their error, which makes the read-only
/// graph operations that only fail through the element type infallible too.
pub trait Publication: Sized {
    /// Identifier of a publication. Unique within one graph.
    type Id: Clone + fmt::Debug;

    /// Failure raised by any publication-level operation.
    type Error: std::error::Error + 'static;

    /// Build a publication from its identifier.
    fn new(id: &Self::Id) -> Result<Self, Self::Error>;

    /// The identifier this publication was built from.
    fn id(&self) -> Result<Self::Id, Self::Error>;

    /// Strict total order over identifiers. `Ordering::Equal` means same id.
    fn compare_ids(lhs: &Self::Id, rhs: &Self::Id) -> Result<Ordering, Self::Error>;
}

//! Arena records for the citation graph

use petgraph::stable_graph::StableDiGraph;

use crate::publication::Publication;

/// Arena holding every live node. Edges point from a cited publication
/// (parent) to the publication citing it (child) and are the owning direction.
pub type Arena<P> = StableDiGraph<Node<P>, Citation>;

/// A single publication in the arena.
#[derive(Debug)]
pub struct Node<P: Publication> {
    /// Identifier the node is registered under.
    pub key: P::Id,
    pub publication: P,
}

impl<P: Publication> Node<P> {
    pub fn new(key: P::Id, publication: P) -> Self {
        Node { key, publication }
    }
}

/// Edge weight. Citations carry no data of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Citation;

//! Structural snapshots of a citation graph

use serde::{Deserialize, Serialize};

/// Every registered publication with its direct neighbours.
///
/// Taken with [`crate::CitationGraph::shape`]. Two snapshots of the same graph
/// compare equal iff no node or edge was added or removed in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphShape<Id> {
    /// Nodes in registry (identifier) order.
    pub nodes: Vec<NodeShape<Id>>,
}

/// One publication in a [`GraphShape`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeShape<Id> {
    pub id: Id,
    /// Publications citing this one.
    pub children: Vec<Id>,
    /// Publications this one cites.
    pub parents: Vec<Id>,
}

impl<Id> GraphShape<Id> {
    /// Number of publications in the snapshot.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of citations in the snapshot.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }

    /// Project identifiers through `f`, e.g. to strip harness state from ids.
    pub fn map_ids<T>(&self, mut f: impl FnMut(&Id) -> T) -> GraphShape<T> {
        GraphShape {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeShape {
                    id: f(&n.id),
                    children: n.children.iter().map(&mut f).collect(),
                    parents: n.parents.iter().map(&mut f).collect(),
                })
                .collect(),
        }
    }
}

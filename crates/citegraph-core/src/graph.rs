//! Citation graph over a petgraph::StableDiGraph arena
//!
//! Edges run from a cited publication (parent) to the publication citing it
//! (child). Parent -> child edges own the child: a publication lives exactly as
//! long as it is reachable from the root. Reading an edge backwards (child ->
//! parent) is observation only and never keeps anything alive.

use std::collections::HashSet;
use std::fmt;

use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;
use tracing::{debug, trace};

use crate::error::{GraphError, Result};
use crate::journal::Transaction;
use crate::model::{Arena, Node};
use crate::publication::Publication;
use crate::registry::Registry;
use crate::shape::{GraphShape, NodeShape};

/// A citation DAG rooted at a permanent seed publication.
///
/// Every mutating operation either succeeds or leaves the graph exactly as it
/// was, whatever the publication type fails on.
pub struct CitationGraph<P: Publication> {
    arena: Arena<P>,
    registry: Registry<P>,
    root: NodeIndex,
}

impl<P: Publication> fmt::Debug for CitationGraph<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CitationGraph")
            .field("node_count", &self.arena.node_count())
            .field("edge_count", &self.arena.edge_count())
            .finish()
    }
}

impl<P: Publication> CitationGraph<P> {
    /// Create a graph holding a single root publication built from `seed_id`.
    pub fn new(seed_id: P::Id) -> Result<Self, P::Error> {
        let publication = P::new(&seed_id)?;

        let mut arena = Arena::default();
        let mut registry = Registry::new();
        let root = arena.add_node(Node::new(seed_id.clone(), publication));
        registry.insert(seed_id.clone(), root)?;

        debug!(root = ?seed_id, "created citation graph");
        Ok(CitationGraph {
            arena,
            registry,
            root,
        })
    }

    /// Identifier of the root publication. Infallible whenever `P::Error` is.
    pub fn root_id(&self) -> std::result::Result<P::Id, P::Error> {
        self.arena[self.root].publication.id()
    }

    /// Whether `id` names a live publication.
    pub fn exists(&self, id: &P::Id) -> std::result::Result<bool, P::Error> {
        Ok(self.resolve(id)?.is_some())
    }

    /// Identifiers of the publications citing `id`.
    pub fn children(&self, id: &P::Id) -> Result<Vec<P::Id>, P::Error> {
        let node = self.node(id)?;
        self.neighbour_ids(node, Direction::Outgoing)
    }

    /// Identifiers of the publications `id` cites.
    pub fn parents(&self, id: &P::Id) -> Result<Vec<P::Id>, P::Error> {
        let node = self.node(id)?;
        self.neighbour_ids(node, Direction::Incoming)
    }

    /// Shared access to a stored publication.
    pub fn get(&self, id: &P::Id) -> Result<&P, P::Error> {
        let node = self.node(id)?;
        self.arena
            .node_weight(node)
            .map(|n| &n.publication)
            .ok_or(GraphError::NotFound)
    }

    /// Mutable access to a stored publication.
    pub fn get_mut(&mut self, id: &P::Id) -> Result<&mut P, P::Error> {
        let node = self.node(id)?;
        self.arena
            .node_weight_mut(node)
            .map(|n| &mut n.publication)
            .ok_or(GraphError::NotFound)
    }

    /// Create publication `id` citing `parent`.
    pub fn create(&mut self, id: P::Id, parent: &P::Id) -> Result<(), P::Error> {
        self.create_with_parents(id, std::slice::from_ref(parent))
    }

    /// Create publication `id` citing every publication in `parents`.
    ///
    /// Fails with `AlreadyExists` if `id` is taken and with `NotFound` if a
    /// parent is missing, both before anything is allocated. Repeated parent
    /// ids produce a single edge.
    pub fn create_with_parents(&mut self, id: P::Id, parents: &[P::Id]) -> Result<(), P::Error> {
        if parents.is_empty() {
            return Err(GraphError::NoParents);
        }
        if self.exists(&id)? {
            return Err(GraphError::AlreadyExists);
        }
        let parent_nodes = parents
            .iter()
            .map(|parent| self.node(parent))
            .collect::<Result<Vec<_>, P::Error>>()?;

        let publication = P::new(&id)?;

        let mut tx = Transaction::begin(&mut self.arena, &mut self.registry);
        let node = tx.add_node(Node::new(id.clone(), publication));
        if !tx.register(id.clone(), node)? {
            return Err(GraphError::AlreadyExists);
        }
        let mut edges = 0;
        for parent in parent_nodes {
            if tx.link(parent, node) {
                edges += 1;
            }
        }
        tx.commit();

        debug!(id = ?id, edges, "created publication");
        Ok(())
    }

    /// Record that `child` cites `parent`. Adding an existing citation is a no-op.
    pub fn add_citation(&mut self, child: &P::Id, parent: &P::Id) -> Result<(), P::Error> {
        let child_node = self.node(child)?;
        let parent_node = self.node(parent)?;

        let mut tx = Transaction::begin(&mut self.arena, &mut self.registry);
        let added = tx.link(parent_node, child_node);
        tx.commit();

        trace!(child = ?child, parent = ?parent, added, "add citation");
        Ok(())
    }

    /// Remove `id` together with every descendant left unreachable from the root.
    ///
    /// Publications still reachable through another parent survive.
    pub fn remove(&mut self, id: &P::Id) -> Result<(), P::Error> {
        let target = self.node(id)?;
        if target == self.root {
            return Err(GraphError::CannotRemoveRoot);
        }

        let reachable = self.reachable_without(target);
        let orphans = self.orphaned_by(target, &reachable);

        let mut tx = Transaction::begin(&mut self.arena, &mut self.registry);
        for &orphan in &orphans {
            let Some(key) = tx.arena().node_weight(orphan).map(|n| n.key.clone()) else {
                continue;
            };
            tx.unregister(&key)?;
            tx.release(orphan);
        }
        let released = tx.commit();

        debug!(id = ?id, released, "removed publication");
        Ok(())
    }

    /// Number of registered publications. Never zero: the root is permanent.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered identifiers, in identifier order.
    pub fn ids(&self) -> impl Iterator<Item = &P::Id> + '_ {
        self.registry.iter().map(|(id, _)| id)
    }

    /// Snapshot of every registered publication and its neighbours.
    ///
    /// Built from registry keys only, so it never calls into the publication.
    /// Neighbour lists are ordered by arena position, which no rolled-back
    /// operation disturbs.
    pub fn shape(&self) -> GraphShape<P::Id> {
        let nodes = self
            .registry
            .iter()
            .map(|(id, node)| NodeShape {
                id: id.clone(),
                children: self.neighbour_keys(node, Direction::Outgoing),
                parents: self.neighbour_keys(node, Direction::Incoming),
            })
            .collect();
        GraphShape { nodes }
    }

    /// Registry lookup that also checks the handle still resolves.
    fn resolve(&self, id: &P::Id) -> std::result::Result<Option<NodeIndex>, P::Error> {
        Ok(self
            .registry
            .get(id)?
            .filter(|&node| self.arena.contains_node(node)))
    }

    fn node(&self, id: &P::Id) -> Result<NodeIndex, P::Error> {
        self.resolve(id)?.ok_or(GraphError::NotFound)
    }

    fn neighbour_ids(&self, node: NodeIndex, direction: Direction) -> Result<Vec<P::Id>, P::Error> {
        self.arena
            .neighbors_directed(node, direction)
            .filter_map(|n| self.arena.node_weight(n))
            .map(|n| n.publication.id().map_err(GraphError::from))
            .collect()
    }

    fn neighbour_keys(&self, node: NodeIndex, direction: Direction) -> Vec<P::Id> {
        let mut neighbours: Vec<NodeIndex> = self.arena.neighbors_directed(node, direction).collect();
        neighbours.sort_unstable();
        neighbours
            .into_iter()
            .filter_map(|n| self.arena.node_weight(n))
            .map(|n| n.key.clone())
            .collect()
    }

    /// Mark phase: every node reachable from the root without entering `excluded`.
    fn reachable_without(&self, excluded: NodeIndex) -> HashSet<NodeIndex> {
        let mut reachable = HashSet::new();
        let mut to_visit = vec![self.root];

        while let Some(current) = to_visit.pop() {
            if current == excluded || !reachable.insert(current) {
                continue;
            }
            to_visit.extend(self.arena.neighbors_directed(current, Direction::Outgoing));
        }

        reachable
    }

    /// Sweep phase: `target` and its descendants outside `reachable`, in
    /// discovery order.
    fn orphaned_by(&self, target: NodeIndex, reachable: &HashSet<NodeIndex>) -> Vec<NodeIndex> {
        let mut orphans = Vec::new();
        let mut seen = HashSet::new();
        let mut to_visit = vec![target];

        while let Some(current) = to_visit.pop() {
            if reachable.contains(&current) || !seen.insert(current) {
                continue;
            }
            orphans.push(current);
            to_visit.extend(self.arena.neighbors_directed(current, Direction::Outgoing));
        }

        orphans
    }
}

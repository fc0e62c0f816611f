//! Undo journal backing transactional graph mutation
//!
//! A [`Transaction`] borrows the arena and the registry for the duration of one
//! public operation. Every step it applies records its inverse; if the
//! transaction is dropped without [`Transaction::commit`] (an early `?` return
//! or an unwind) the recorded steps are undone newest first. Undo steps only
//! touch the arena and known registry slots, so rollback never calls into the
//! publication and cannot fail.
//!
//! Node releases are deferred: they are queued by [`Transaction::release`] and
//! only applied at commit, once nothing fallible is left to do.

use petgraph::stable_graph::{EdgeIndex, NodeIndex};

use crate::model::{Arena, Citation, Node};
use crate::publication::Publication;
use crate::registry::Registry;

/// Inverse of one applied step.
enum Undo<P: Publication> {
    /// A node was allocated; remove it.
    AddNode(NodeIndex),
    /// An id was registered at this slot; discard it.
    Register(usize),
    /// An id was unregistered from this slot; put it back.
    Unregister {
        slot: usize,
        id: P::Id,
        node: NodeIndex,
    },
    /// An edge was added; remove it.
    Link(EdgeIndex),
}

pub struct Transaction<'g, P: Publication> {
    arena: &'g mut Arena<P>,
    registry: &'g mut Registry<P>,
    undo: Vec<Undo<P>>,
    released: Vec<NodeIndex>,
    committed: bool,
}

impl<'g, P: Publication> Transaction<'g, P> {
    pub fn begin(arena: &'g mut Arena<P>, registry: &'g mut Registry<P>) -> Self {
        Transaction {
            arena,
            registry,
            undo: Vec::new(),
            released: Vec::new(),
            committed: false,
        }
    }

    /// Read access to the arena as it currently stands.
    pub fn arena(&self) -> &Arena<P> {
        &*self.arena
    }

    /// Number of steps applied so far.
    pub fn steps(&self) -> usize {
        self.undo.len()
    }

    /// Allocate `node` in the arena.
    pub fn add_node(&mut self, node: Node<P>) -> NodeIndex {
        let idx = self.arena.add_node(node);
        self.undo.push(Undo::AddNode(idx));
        idx
    }

    /// Register `id`. Returns false if the id was already taken.
    pub fn register(&mut self, id: P::Id, node: NodeIndex) -> Result<bool, P::Error> {
        match self.registry.insert(id, node)? {
            Some(slot) => {
                self.undo.push(Undo::Register(slot));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Unregister `id`, returning the index it pointed at.
    pub fn unregister(&mut self, id: &P::Id) -> Result<Option<NodeIndex>, P::Error> {
        match self.registry.remove(id)? {
            Some((slot, id, node)) => {
                self.undo.push(Undo::Unregister { slot, id, node });
                Ok(Some(node))
            }
            None => Ok(None),
        }
    }

    /// Add the owning edge `parent -> child`. Existing edges are left alone;
    /// returns whether an edge was added.
    pub fn link(&mut self, parent: NodeIndex, child: NodeIndex) -> bool {
        if self.arena.find_edge(parent, child).is_some() {
            return false;
        }
        let edge = self.arena.add_edge(parent, child, Citation);
        self.undo.push(Undo::Link(edge));
        true
    }

    /// Queue `node` for release at commit.
    pub fn release(&mut self, node: NodeIndex) {
        self.released.push(node);
    }

    /// Apply queued releases and keep every applied step. Returns the number of
    /// nodes released.
    pub fn commit(mut self) -> usize {
        let released = std::mem::take(&mut self.released);
        for &node in &released {
            self.arena.remove_node(node);
        }
        self.undo.clear();
        self.committed = true;
        released.len()
    }

    fn rollback(&mut self) {
        let steps = self.undo.len();
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::AddNode(node) => {
                    self.arena.remove_node(node);
                }
                Undo::Register(slot) => self.registry.discard(slot),
                Undo::Unregister { slot, id, node } => self.registry.restore(slot, id, node),
                Undo::Link(edge) => {
                    self.arena.remove_edge(edge);
                }
            }
        }
        self.released.clear();
        if steps > 0 {
            tracing::debug!(steps, "rolled back transaction");
        }
    }
}

impl<P: Publication> Drop for Transaction<'_, P> {
    fn drop(&mut self) {
        if !self.committed {
            self.rollback();
        }
    }
}

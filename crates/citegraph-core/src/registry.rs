//! Identifier registry for reachable publications

use std::cmp::Ordering;

use petgraph::stable_graph::NodeIndex;

use crate::publication::Publication;

/// Sorted table mapping identifiers to arena indices.
///
/// Ordering comes from [`Publication::compare_ids`], which may fail, so the
/// table is a sorted vector searched with a fallible binary search rather than
/// a `BTreeMap`. Mutations report the slot they touched so a journal can put
/// the table back exactly as it was.
pub struct Registry<P: Publication> {
    entries: Vec<(P::Id, NodeIndex)>,
}

impl<P: Publication> Registry<P> {
    pub fn new() -> Self {
        Registry {
            entries: Vec::new(),
        }
    }

    /// Number of registered identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binary search for `id`. `Ok(slot)` if found, `Err(slot)` with the
    /// insertion point otherwise.
    fn search(&self, id: &P::Id) -> Result<Result<usize, usize>, P::Error> {
        let mut lo = 0;
        let mut hi = self.entries.len();

        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let Some((probe, _)) = self.entries.get(mid) else {
                break;
            };
            match P::compare_ids(probe, id)? {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Ok(Ok(mid)),
            }
        }

        Ok(Err(lo))
    }

    /// Look up the arena index registered for `id`.
    pub fn get(&self, id: &P::Id) -> Result<Option<NodeIndex>, P::Error> {
        Ok(match self.search(id)? {
            Ok(slot) => self.entries.get(slot).map(|(_, node)| *node),
            Err(_) => None,
        })
    }

    /// Register `id`. Returns the slot it now occupies, or `None` if it was
    /// already registered (the table is left unchanged).
    pub fn insert(&mut self, id: P::Id, node: NodeIndex) -> Result<Option<usize>, P::Error> {
        match self.search(&id)? {
            Ok(_) => Ok(None),
            Err(slot) => {
                self.entries.insert(slot, (id, node));
                Ok(Some(slot))
            }
        }
    }

    /// Unregister `id`, returning the vacated slot and the removed entry.
    pub fn remove(&mut self, id: &P::Id) -> Result<Option<(usize, P::Id, NodeIndex)>, P::Error> {
        Ok(match self.search(id)? {
            Ok(slot) => {
                let (key, node) = self.entries.remove(slot);
                Some((slot, key, node))
            }
            Err(_) => None,
        })
    }

    /// Put an entry back at a known slot. Performs no comparisons.
    pub(crate) fn restore(&mut self, slot: usize, id: P::Id, node: NodeIndex) {
        let slot = slot.min(self.entries.len());
        self.entries.insert(slot, (id, node));
    }

    /// Drop the entry at a known slot. Performs no comparisons.
    pub(crate) fn discard(&mut self, slot: usize) {
        if slot < self.entries.len() {
            self.entries.remove(slot);
        }
    }

    /// Iterate over entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&P::Id, NodeIndex)> + '_ {
        self.entries.iter().map(|(id, node)| (id, *node))
    }
}

impl<P: Publication> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

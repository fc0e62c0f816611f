//! Integration tests for citegraph-core
//!
//! Random mutation sequences checked against the graph's structural
//! invariants after every step.

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};
use std::convert::Infallible;

use citegraph_core::{CitationGraph, GraphError, Publication};
use proptest::prelude::*;

const ROOT: u8 = 0;
const MAX_ID: u8 = 12;

#[derive(Debug)]
struct Article {
    id: u8,
}

impl Publication for Article {
    type Id = u8;
    type Error = Infallible;

    fn new(id: &u8) -> Result<Self, Infallible> {
        Ok(Article { id: *id })
    }

    fn id(&self) -> Result<u8, Infallible> {
        Ok(self.id)
    }

    fn compare_ids(lhs: &u8, rhs: &u8) -> Result<Ordering, Infallible> {
        Ok(lhs.cmp(rhs))
    }
}

#[derive(Debug, Clone)]
enum Op {
    Create(u8, Vec<u8>),
    Cite(u8, u8),
    Remove(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..=MAX_ID, prop::collection::vec(0..=MAX_ID, 1..4))
            .prop_map(|(id, parents)| Op::Create(id, parents)),
        2 => (0..=MAX_ID, 0..=MAX_ID).prop_map(|(child, parent)| Op::Cite(child, parent)),
        1 => (0..=MAX_ID).prop_map(Op::Remove),
    ]
}

fn apply(graph: &mut CitationGraph<Article>, op: &Op) -> Result<(), GraphError<Infallible>> {
    match op {
        Op::Create(id, parents) => graph.create_with_parents(*id, parents),
        Op::Cite(child, parent) => graph.add_citation(child, parent),
        Op::Remove(id) => graph.remove(id),
    }
}

/// Ids reachable from the root by following child edges.
fn reachable(graph: &CitationGraph<Article>) -> HashSet<u8> {
    let mut seen = HashSet::from([ROOT]);
    let mut queue = VecDeque::from([ROOT]);

    while let Some(current) = queue.pop_front() {
        for child in graph.children(&current).unwrap() {
            if seen.insert(child) {
                queue.push_back(child);
            }
        }
    }

    seen
}

fn check_invariants(graph: &CitationGraph<Article>) -> Result<(), TestCaseError> {
    let reachable = reachable(graph);

    for id in 0..=MAX_ID {
        let Ok(exists) = graph.exists(&id);
        prop_assert_eq!(exists, reachable.contains(&id), "id {}", id);
    }
    prop_assert_eq!(graph.len(), reachable.len());
    let Ok(root) = graph.root_id();
    prop_assert_eq!(root, ROOT);

    for &parent in &reachable {
        let children = graph.children(&parent).unwrap();
        let unique: HashSet<u8> = children.iter().copied().collect();
        prop_assert_eq!(unique.len(), children.len(), "duplicate child edge under {}", parent);

        for child in children {
            prop_assert!(graph.parents(&child).unwrap().contains(&parent));
        }
        for grandparent in graph.parents(&parent).unwrap() {
            prop_assert!(graph.children(&grandparent).unwrap().contains(&parent));
        }
    }

    Ok(())
}

proptest! {
    /// Property: registry membership equals reachability from the root, and
    /// every edge is visible from both ends, after every mutation.
    #[test]
    fn prop_invariants_hold_after_every_mutation(ops in prop::collection::vec(op(), 1..60)) {
        let mut graph = CitationGraph::<Article>::new(ROOT).unwrap();

        for op in &ops {
            let before = graph.shape();
            if let Err(err) = apply(&mut graph, op) {
                prop_assert!(!err.is_propagated());
                prop_assert_eq!(&graph.shape(), &before, "failed {:?} changed the graph", op);
            }
            check_invariants(&graph)?;
        }
    }

    /// Property: the root survives any sequence and can never be removed.
    #[test]
    fn prop_root_is_permanent(ops in prop::collection::vec(op(), 0..40)) {
        let mut graph = CitationGraph::<Article>::new(ROOT).unwrap();
        for op in &ops {
            let _ = apply(&mut graph, op);
        }

        let before = graph.shape();
        prop_assert!(matches!(graph.remove(&ROOT), Err(GraphError::CannotRemoveRoot)));
        prop_assert_eq!(graph.shape(), before);
        prop_assert!(graph.exists(&ROOT).unwrap());
    }

    /// Property: citing twice is the same as citing once.
    #[test]
    fn prop_add_citation_is_idempotent(ops in prop::collection::vec(op(), 0..40), child in 0..=MAX_ID, parent in 0..=MAX_ID) {
        let mut graph = CitationGraph::<Article>::new(ROOT).unwrap();
        for op in &ops {
            let _ = apply(&mut graph, op);
        }

        if graph.add_citation(&child, &parent).is_ok() {
            let once = graph.shape();
            graph.add_citation(&child, &parent).unwrap();
            prop_assert_eq!(graph.shape(), once);
        }
    }
}

#[test]
fn test_cascade_spares_nodes_with_another_path() {
    let mut graph = CitationGraph::<Article>::new(ROOT).unwrap();
    graph.create(1, &ROOT).unwrap();
    graph.create(2, &1).unwrap();
    graph.create(3, &2).unwrap();
    graph.create_with_parents(4, &[3, ROOT]).unwrap();
    graph.create(5, &4).unwrap();

    graph.remove(&1).unwrap();

    let ids: Vec<u8> = graph.ids().copied().collect();
    assert_eq!(ids, vec![ROOT, 4, 5]);
    assert_eq!(graph.parents(&4).unwrap(), vec![ROOT]);
    assert_eq!(graph.children(&4).unwrap(), vec![5]);
}

#[test]
fn test_graph_debug_reports_counts() {
    let mut graph = CitationGraph::<Article>::new(ROOT).unwrap();
    graph.create(1, &ROOT).unwrap();

    assert_eq!(format!("{graph:?}"), "CitationGraph { node_count: 2, edge_count: 1 }");
}

// Copyright 2025 Cowboy AI, LLC.

//! Committed layer of the graph store

use std::collections::BTreeMap;
use std::ops::RangeBounds;

use crate::identifiers::NodeId;
use crate::model::Node;
use crate::relationship_types::{Edge, EdgeKey};

/// A single mutation of the graph
///
/// `None` deletes the row, `Some` creates or replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Write a node row
    Node(NodeId, Option<Node>),
    /// Write an edge row
    Edge(EdgeKey, Option<Edge>),
}

/// The committed nodes and edges
///
/// Both tables are ordered maps so every listing comes back in key order
/// (creation order for nodes).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphState {
    pub(crate) nodes: BTreeMap<NodeId, Node>,
    pub(crate) edges: BTreeMap<EdgeKey, Edge>,
}

impl GraphState {
    /// Empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one write in place
    pub fn apply(&mut self, write: Write) {
        match write {
            Write::Node(id, Some(node)) => {
                self.nodes.insert(id, node);
            }
            Write::Node(id, None) => {
                self.nodes.remove(&id);
            }
            Write::Edge(key, Some(edge)) => {
                self.edges.insert(key, edge);
            }
            Write::Edge(key, None) => {
                self.edges.remove(&key);
            }
        }
    }

    /// Number of stored nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Largest node id in use
    pub fn max_node_id(&self) -> Option<NodeId> {
        self.nodes.keys().next_back().copied()
    }

    /// Iterate nodes in id order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterate edges in key order
    pub fn edges(&self) -> impl Iterator<Item = (&EdgeKey, &Edge)> {
        self.edges.iter()
    }
}

/// Read view of one table: a committed base with an optional staged delta
///
/// A staged `Some` shadows the committed row, a staged `None` hides it.
pub(crate) struct Layered<'a, K, V> {
    base: &'a BTreeMap<K, V>,
    delta: Option<&'a BTreeMap<K, Option<V>>>,
}

impl<'a, K: Ord + Copy, V> Layered<'a, K, V> {
    pub(crate) fn new(base: &'a BTreeMap<K, V>, delta: Option<&'a BTreeMap<K, Option<V>>>) -> Self {
        Self { base, delta }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&'a V> {
        if let Some(cell) = self.delta.and_then(|delta| delta.get(key)) {
            return cell.as_ref();
        }
        self.base.get(key)
    }

    pub(crate) fn range<R>(&self, range: R) -> Vec<(K, &'a V)>
    where
        R: RangeBounds<K> + Clone,
    {
        let mut merged: BTreeMap<K, &'a V> = self
            .base
            .range(range.clone())
            .map(|(key, value)| (*key, value))
            .collect();
        if let Some(delta) = self.delta {
            for (key, cell) in delta.range(range) {
                match cell {
                    Some(value) => {
                        merged.insert(*key, value);
                    }
                    None => {
                        merged.remove(key);
                    }
                }
            }
        }
        merged.into_iter().collect()
    }

    pub(crate) fn all(&self) -> Vec<(K, &'a V)> {
        self.range(..)
    }
}

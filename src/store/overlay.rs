// Copyright 2025 Cowboy AI, LLC.

//! Staged overlay of an active transaction

use std::collections::BTreeMap;

use crate::identifiers::NodeId;
use crate::model::Node;
use crate::relationship_types::{Edge, EdgeKey};

use super::graph::{GraphState, Write};

/// Staged rows shadowing the committed layer
///
/// Each cell is `Some(row)` for a staged create/update and `None` for a
/// staged delete. Keys with no cell fall through to the committed layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    pub(crate) nodes: BTreeMap<NodeId, Option<Node>>,
    pub(crate) edges: BTreeMap<EdgeKey, Option<Edge>>,
}

/// Prior state of an overlay cell, used to undo a staged write exactly
///
/// The outer `None` means the key had no staged cell at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restore {
    /// Prior node cell
    Node(NodeId, Option<Option<Node>>),
    /// Prior edge cell
    Edge(EdgeKey, Option<Option<Edge>>),
}

impl Overlay {
    /// Empty overlay
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell a write would replace, without staging it
    pub fn prior(&self, write: &Write) -> Restore {
        match write {
            Write::Node(id, _) => Restore::Node(*id, self.nodes.get(id).cloned()),
            Write::Edge(key, _) => Restore::Edge(*key, self.edges.get(key).cloned()),
        }
    }

    /// Stage a write, returning what it replaced
    pub fn stage(&mut self, write: Write) -> Restore {
        match write {
            Write::Node(id, node) => Restore::Node(id, self.nodes.insert(id, node)),
            Write::Edge(key, edge) => Restore::Edge(key, self.edges.insert(key, edge)),
        }
    }

    /// Put a cell back to the state captured by [`Overlay::stage`]
    pub fn restore(&mut self, restore: Restore) {
        match restore {
            Restore::Node(id, Some(prior)) => {
                self.nodes.insert(id, prior);
            }
            Restore::Node(id, None) => {
                self.nodes.remove(&id);
            }
            Restore::Edge(key, Some(prior)) => {
                self.edges.insert(key, prior);
            }
            Restore::Edge(key, None) => {
                self.edges.remove(&key);
            }
        }
    }

    /// Whether nothing is staged
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Number of staged cells
    pub fn len(&self) -> usize {
        self.nodes.len() + self.edges.len()
    }

    /// Staged node ids in id order
    pub fn staged_nodes(&self) -> impl Iterator<Item = (&NodeId, &Option<Node>)> {
        self.nodes.iter()
    }

    /// Staged edge keys in key order
    pub fn staged_edges(&self) -> impl Iterator<Item = (&EdgeKey, &Option<Edge>)> {
        self.edges.iter()
    }

    /// Produce the committed layer that results from applying every cell
    ///
    /// The input is left untouched; the caller swaps the result in once it
    /// has been persisted.
    pub fn merged_onto(&self, committed: &GraphState) -> GraphState {
        let mut next = committed.clone();
        for (id, node) in &self.nodes {
            next.apply(Write::Node(*id, node.clone()));
        }
        for (key, edge) in &self.edges {
            next.apply(Write::Edge(*key, edge.clone()));
        }
        next
    }
}

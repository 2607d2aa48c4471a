// Copyright 2025 Cowboy AI, LLC.

//! Graph store: committed layer, staged overlay and persistence
//!
//! The store owns the node id sequence. Ids handed out inside a transaction
//! that is later rolled back are not reused, so id order stays creation
//! order across the lifetime of the store.

mod graph;
mod overlay;
mod persistence;
mod snapshot;

pub use graph::{GraphState, Write};
pub use overlay::{Overlay, Restore};
pub use persistence::{
    EdgeRow, GraphPersistence, JsonFilePersistence, MemoryPersistence, PersistedGraph,
    PERSISTED_VERSION,
};
#[cfg(test)]
pub use persistence::MockGraphPersistence;
pub use snapshot::{GraphStatistics, PropertyEdge, Snapshot};

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::errors::StorageError;
use crate::identifiers::NodeId;
use crate::node_types::EntityKind;

/// What a commit touched, used to invalidate cached projections
///
/// `nodes` holds every written node id, the parents of its old and new
/// values, and the owner and endpoints of every written edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Touched node ids
    pub nodes: BTreeSet<NodeId>,
    /// Touched entity kinds
    pub kinds: BTreeSet<EntityKind>,
}

impl ChangeSet {
    /// Describe what applying `overlay` to `committed` changes
    pub fn between(committed: &GraphState, overlay: &Overlay) -> Self {
        let mut changes = ChangeSet::default();
        for (id, cell) in overlay.staged_nodes() {
            changes.nodes.insert(*id);
            for node in committed.nodes.get(id).into_iter().chain(cell.iter()) {
                changes.nodes.extend(node.parents());
                changes.kinds.insert(node.kind());
            }
        }
        for (key, cell) in overlay.staged_edges() {
            changes.nodes.insert(key.owner);
            changes.nodes.insert(key.from);
            for edge in committed.edges.get(key).into_iter().chain(cell.iter()) {
                changes.nodes.insert(edge.to);
            }
            if let Some(kind) = key.kind.entity_kind() {
                changes.kinds.insert(kind);
            }
        }
        changes
    }

    /// Whether nothing was touched
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.kinds.is_empty()
    }
}

/// Committed layer, optional overlay and the backend they flush to
pub struct GraphStore {
    committed: GraphState,
    overlay: Option<Overlay>,
    next_id: NodeId,
    persistence: Box<dyn GraphPersistence>,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("nodes", &self.committed.node_count())
            .field("edges", &self.committed.edge_count())
            .field("staged", &self.overlay.as_ref().map(Overlay::len))
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl GraphStore {
    /// Store that keeps nothing beyond the process
    pub fn in_memory() -> Self {
        Self {
            committed: GraphState::new(),
            overlay: None,
            next_id: NodeId::from_raw(1),
            persistence: Box::new(MemoryPersistence),
        }
    }

    /// Open a store over `persistence`, loading whatever it holds
    pub fn open(persistence: Box<dyn GraphPersistence>) -> Result<Self, StorageError> {
        let (committed, next_id) = match persistence.load()? {
            Some(graph) => graph.restore()?,
            None => (GraphState::new(), NodeId::from_raw(1)),
        };
        debug!(
            nodes = committed.node_count(),
            edges = committed.edge_count(),
            next_id = %next_id,
            "Opened graph store"
        );
        Ok(Self {
            committed,
            overlay: None,
            next_id,
            persistence,
        })
    }

    /// Current view: the overlay over the committed layer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(&self.committed, self.overlay.as_ref())
    }

    /// Committed layer only
    pub fn committed(&self) -> Snapshot<'_> {
        Snapshot::new(&self.committed, None)
    }

    /// Whether an overlay is open
    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// The open overlay
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Next id the sequence will hand out
    pub fn peek_next_id(&self) -> NodeId {
        self.next_id
    }

    /// Hand out the next node id
    pub fn allocate_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id = NodeId::from_raw(id.raw() + 1);
        id
    }

    /// Open an empty overlay if none is open
    pub fn open_overlay(&mut self) {
        self.overlay.get_or_insert_with(Overlay::new);
    }

    /// The overlay cell `write` would replace
    pub fn prior(&self, write: &Write) -> Restore {
        match &self.overlay {
            Some(overlay) => overlay.prior(write),
            None => Overlay::new().prior(write),
        }
    }

    /// Stage a write in the overlay, opening one if needed
    pub fn stage(&mut self, write: Write) -> Restore {
        self.overlay.get_or_insert_with(Overlay::new).stage(write)
    }

    /// Undo one staged write
    pub fn restore(&mut self, restore: Restore) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.restore(restore);
        }
    }

    /// Drop the overlay, returning it
    pub fn discard_overlay(&mut self) -> Option<Overlay> {
        self.overlay.take()
    }

    /// Persist the merged layer and swap it in
    ///
    /// On failure the committed layer and the overlay are both left as they
    /// were.
    pub fn commit_overlay(&mut self) -> Result<ChangeSet, StorageError> {
        let Some(overlay) = self.overlay.as_ref() else {
            return Ok(ChangeSet::default());
        };
        if overlay.is_empty() {
            self.overlay = None;
            return Ok(ChangeSet::default());
        }

        let merged = overlay.merged_onto(&self.committed);
        let changes = ChangeSet::between(&self.committed, overlay);
        if let Err(err) = self
            .persistence
            .flush(&PersistedGraph::capture(&merged, self.next_id))
        {
            warn!(error = %err, staged = overlay.len(), "Flush failed; committed layer unchanged");
            return Err(err);
        }

        self.committed = merged;
        self.overlay = None;
        Ok(changes)
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

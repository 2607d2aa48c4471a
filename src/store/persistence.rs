// Copyright 2025 Cowboy AI, LLC.

//! Persistence backends for the committed layer
//!
//! The committed layer is flushed as a whole on every commit. Backends
//! receive the table layout in [`PersistedGraph`]; they never see the
//! overlay.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::StorageError;
use crate::identifiers::NodeId;
use crate::model::{Category, Datatype, Functor, Morphism, NaturalTransformation, Node, Object};
use crate::relationship_types::{Edge, EdgeKey, RelationKind};

use super::graph::{GraphState, Write};

/// Current version of the persisted layout
pub const PERSISTED_VERSION: u32 = 1;

/// One row of a relationship table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    /// Functor, natural transformation or object owning the edge
    pub owner: NodeId,
    /// Mapped source
    pub from: NodeId,
    /// Mapped target
    pub to: NodeId,
    /// Field name for property rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// When the edge was written
    pub created_at: DateTime<Utc>,
}

/// Table layout of a persisted graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedGraph {
    /// Layout version
    pub version: u32,
    /// Next id the sequence hands out
    pub next_id: NodeId,
    /// Category table
    pub categories: Vec<Category>,
    /// Object table
    pub objects: Vec<Object>,
    /// Morphism table
    pub morphisms: Vec<Morphism>,
    /// Functor table
    pub functors: Vec<Functor>,
    /// Natural transformation table
    pub natural_transformations: Vec<NaturalTransformation>,
    /// Datatype table
    pub datatypes: Vec<Datatype>,
    /// Functor object-map rows
    pub object_mappings: Vec<EdgeRow>,
    /// Functor morphism-map rows
    pub morphism_mappings: Vec<EdgeRow>,
    /// Natural transformation component rows
    pub components: Vec<EdgeRow>,
    /// Object property rows
    pub properties: Vec<EdgeRow>,
}

impl PersistedGraph {
    /// Split a committed layer into tables
    pub fn capture(state: &GraphState, next_id: NodeId) -> Self {
        let mut graph = PersistedGraph {
            version: PERSISTED_VERSION,
            next_id,
            categories: Vec::new(),
            objects: Vec::new(),
            morphisms: Vec::new(),
            functors: Vec::new(),
            natural_transformations: Vec::new(),
            datatypes: Vec::new(),
            object_mappings: Vec::new(),
            morphism_mappings: Vec::new(),
            components: Vec::new(),
            properties: Vec::new(),
        };

        for node in state.nodes() {
            match node.clone() {
                Node::Category(c) => graph.categories.push(c),
                Node::Object(o) => graph.objects.push(o),
                Node::Morphism(m) => graph.morphisms.push(m),
                Node::Functor(f) => graph.functors.push(f),
                Node::NaturalTransformation(nt) => graph.natural_transformations.push(nt),
                Node::Datatype(d) => graph.datatypes.push(d),
            }
        }

        for (key, edge) in state.edges() {
            let row = EdgeRow {
                owner: key.owner,
                from: key.from,
                to: edge.to,
                label: edge.label.clone(),
                created_at: edge.created_at,
            };
            match key.kind {
                RelationKind::ObjectMapping => graph.object_mappings.push(row),
                RelationKind::MorphismMapping => graph.morphism_mappings.push(row),
                RelationKind::Component => graph.components.push(row),
                RelationKind::Property => graph.properties.push(row),
                RelationKind::Includes | RelationKind::Source | RelationKind::Target => {}
            }
        }

        graph
    }

    /// Rebuild the committed layer and the next free id
    ///
    /// The returned id is never below one past the largest stored id, even
    /// if the recorded `next_id` is stale.
    pub fn restore(self) -> Result<(GraphState, NodeId), StorageError> {
        if self.version != PERSISTED_VERSION {
            return Err(StorageError::Serialization(format!(
                "unsupported layout version {}",
                self.version
            )));
        }

        let mut state = GraphState::new();
        let nodes = self
            .categories
            .into_iter()
            .map(Node::Category)
            .chain(self.objects.into_iter().map(Node::Object))
            .chain(self.morphisms.into_iter().map(Node::Morphism))
            .chain(self.functors.into_iter().map(Node::Functor))
            .chain(
                self.natural_transformations
                    .into_iter()
                    .map(Node::NaturalTransformation),
            )
            .chain(self.datatypes.into_iter().map(Node::Datatype));
        for node in nodes {
            state.apply(Write::Node(node.id(), Some(node)));
        }

        let tables = [
            (RelationKind::ObjectMapping, self.object_mappings),
            (RelationKind::MorphismMapping, self.morphism_mappings),
            (RelationKind::Component, self.components),
            (RelationKind::Property, self.properties),
        ];
        for (kind, rows) in tables {
            for row in rows {
                let edge = Edge {
                    to: row.to,
                    label: row.label,
                    created_at: row.created_at,
                };
                state.apply(Write::Edge(EdgeKey::new(kind, row.owner, row.from), Some(edge)));
            }
        }

        let floor = state
            .max_node_id()
            .map(|id| id.raw().saturating_add(1))
            .unwrap_or(1);
        let next_id = NodeId::from_raw(self.next_id.raw().max(floor));
        Ok((state, next_id))
    }
}

/// Backend that stores the committed layer
#[cfg_attr(test, mockall::automock)]
pub trait GraphPersistence: Send + Sync {
    /// Load the last flushed graph, `None` if nothing was stored yet
    fn load(&self) -> Result<Option<PersistedGraph>, StorageError>;

    /// Replace the stored graph
    fn flush(&self, graph: &PersistedGraph) -> Result<(), StorageError>;
}

/// Backend that keeps nothing beyond the process
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryPersistence;

impl GraphPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<PersistedGraph>, StorageError> {
        Ok(None)
    }

    fn flush(&self, _graph: &PersistedGraph) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Backend writing the table layout as a JSON document
///
/// Flushes write a sibling `.tmp` file and rename it over the target, so a
/// failed flush leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Persist to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target document path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(path: &Path, err: std::io::Error) -> StorageError {
        StorageError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl GraphPersistence for JsonFilePersistence {
    fn load(&self) -> Result<Option<PersistedGraph>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path).map_err(|e| Self::io_error(&self.path, e))?;
        let graph = serde_json::from_str(&text)?;
        debug!(path = %self.path.display(), "Loaded persisted graph");
        Ok(Some(graph))
    }

    fn flush(&self, graph: &PersistedGraph) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
        }
        let bytes = serde_json::to_vec_pretty(graph)?;
        let temp = self.temp_path();
        fs::write(&temp, bytes).map_err(|e| Self::io_error(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| Self::io_error(&self.path, e))?;
        debug!(path = %self.path.display(), next_id = %graph.next_id, "Flushed graph");
        Ok(())
    }
}

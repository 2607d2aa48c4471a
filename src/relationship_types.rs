// Copyright 2025 Cowboy AI, LLC.

//! Relationship types for edges in the category graph
//!
//! Containment and typing relationships are carried by the entities
//! themselves (an object knows its category, a morphism its endpoints).
//! Mapping and property relationships live in the edge table, keyed by the
//! entity that owns them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::NodeId;
use crate::node_types::EntityKind;

/// Types of relationships (edges) between nodes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    // Structural relationships
    /// Category contains an object or morphism
    Includes,
    /// Morphism, functor or natural transformation points at its source
    Source,
    /// Morphism, functor or natural transformation points at its target
    Target,

    // Mapping relationships
    /// Functor sends a source object to a target object
    ObjectMapping,
    /// Functor sends a source morphism to a target morphism
    MorphismMapping,
    /// Natural transformation picks a component morphism at an object
    Component,

    // Attribute relationships
    /// Object carries a datatype under a field name
    Property,
}

impl RelationKind {
    /// Containment and typing relationships, drawn in views but never stored
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RelationKind::Includes | RelationKind::Source | RelationKind::Target
        )
    }

    /// Entity kind used for change-log entries of stored edges
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            RelationKind::ObjectMapping => Some(EntityKind::ObjectMapping),
            RelationKind::MorphismMapping => Some(EntityKind::MorphismMapping),
            RelationKind::Component => Some(EntityKind::Component),
            RelationKind::Property => Some(EntityKind::Property),
            _ => None,
        }
    }

    /// Label used for the edge in display graphs
    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::Includes => "includes",
            RelationKind::Source => "source",
            RelationKind::Target => "target",
            RelationKind::ObjectMapping => "maps object",
            RelationKind::MorphismMapping => "maps morphism",
            RelationKind::Component => "component",
            RelationKind::Property => "property",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Key of a stored edge
///
/// `owner` is the functor, natural transformation or object the edge belongs
/// to and `from` is the mapped source (object, morphism or datatype). The
/// derived ordering groups edges by kind and owner, which makes
/// "all edges of F" a contiguous range.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EdgeKey {
    /// Relationship kind
    pub kind: RelationKind,
    /// Entity owning the edge
    pub owner: NodeId,
    /// Mapped source
    pub from: NodeId,
}

impl EdgeKey {
    /// Create an edge key
    pub fn new(kind: RelationKind, owner: impl Into<NodeId>, from: impl Into<NodeId>) -> Self {
        Self {
            kind,
            owner: owner.into(),
            from: from.into(),
        }
    }

    /// Inclusive range covering every edge of `kind` owned by `owner`
    pub fn owner_range(kind: RelationKind, owner: NodeId) -> std::ops::RangeInclusive<EdgeKey> {
        EdgeKey::new(kind, owner, NodeId::MIN)..=EdgeKey::new(kind, owner, NodeId::MAX)
    }
}

/// Value of a stored edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Mapped target (object, morphism or datatype)
    pub to: NodeId,
    /// Optional attribute, e.g. the field name of a property edge
    pub label: Option<String>,
    /// When the edge was written
    pub created_at: DateTime<Utc>,
}

impl Edge {
    /// Create an edge to `to`
    pub fn to(to: impl Into<NodeId>) -> Self {
        Self {
            to: to.into(),
            label: None,
            created_at: Utc::now(),
        }
    }

    /// Attach a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

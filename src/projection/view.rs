// Copyright 2025 Cowboy AI, LLC.

//! View models handed to renderers
//!
//! A view is a flat list of styled nodes and edges plus free-form metadata.
//! Node ids are prefixed with the entity kind (`obj_7`, `func_12`) so that
//! views mixing several kinds never collide.

use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::CategoryError;
use crate::identifiers::NodeId;
use crate::model::{CategoryId, FunctorId, MorphismId, NaturalTransformationId};
use crate::node_types::EntityKind;

/// What a view is built over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewScope {
    /// One category
    Category(CategoryId),
    /// One functor and the categories it connects
    Functor(FunctorId),
    /// Every functor
    Functors,
    /// One natural transformation and its functors
    NaturalTransformation(NaturalTransformationId),
    /// Every natural transformation
    NaturalTransformations,
    /// Everything
    Complete,
}

/// How entities of a scope are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// The rank above becomes nodes, the entity itself an edge
    #[default]
    Standard,
    /// Every entity is a node, containment and typing are edges
    Meta,
    /// All categories, functors and natural transformations at once
    Complete,
    /// Objects of both categories with object-mapping edges
    FunctorDetail,
    /// Target-category objects with component edges
    NtDetail,
}

impl ViewMode {
    /// Every mode, in menu order
    pub const ALL: [ViewMode; 5] = [
        ViewMode::Standard,
        ViewMode::Meta,
        ViewMode::Complete,
        ViewMode::FunctorDetail,
        ViewMode::NtDetail,
    ];

    /// Name used in metadata and when parsing
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Standard => "standard",
            ViewMode::Meta => "meta",
            ViewMode::Complete => "complete",
            ViewMode::FunctorDetail => "functor-detail",
            ViewMode::NtDetail => "nt-detail",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        ViewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == wanted)
            .ok_or_else(|| CategoryError::invalid_operation(format!("unknown view mode '{s}'")))
    }
}

/// Naturality square to overlay on an `nt-detail` view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NaturalitySquare {
    /// Transformation whose components form the vertical sides
    pub nt_id: NaturalTransformationId,
    /// Source-category morphism whose images form the horizontal sides
    pub morphism_id: MorphismId,
}

impl NaturalitySquare {
    /// Square of `nt` at `morphism`
    pub fn new(nt_id: NaturalTransformationId, morphism_id: MorphismId) -> Self {
        Self { nt_id, morphism_id }
    }
}

/// Role of a drawn edge, which also decides its styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRole {
    /// Non-identity morphism between objects
    Morphism,
    /// Identity loop
    Identity,
    /// Functor between categories
    Functor,
    /// Natural transformation between functors
    NaturalTransformation,
    /// Functor object-map entry
    ObjectMapping,
    /// Natural transformation component
    Component,
    /// Image of a morphism under a functor, drawn over a square
    Naturality,
    /// Object field pointing at a datatype
    Property,
    /// Containment or typing
    Structural,
}

impl EdgeRole {
    fn color(&self) -> &'static str {
        match self {
            EdgeRole::Morphism => "#34495e",
            EdgeRole::Identity => "#2c3e50",
            EdgeRole::Functor => "#9b59b6",
            EdgeRole::NaturalTransformation => "#e67e22",
            EdgeRole::ObjectMapping => "#8e44ad",
            EdgeRole::Component => "#d35400",
            EdgeRole::Naturality => "#16a085",
            EdgeRole::Property => "#7f8c8d",
            EdgeRole::Structural => "#bdc3c7",
        }
    }

    fn width(&self) -> u32 {
        match self {
            EdgeRole::Functor => 3,
            EdgeRole::Identity | EdgeRole::Structural | EdgeRole::Property => 1,
            _ => 2,
        }
    }

    fn dashed(&self) -> bool {
        matches!(
            self,
            EdgeRole::Structural | EdgeRole::ObjectMapping | EdgeRole::Property
        )
    }
}

/// A drawn node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViewNode {
    /// Kind-prefixed id, unique within a view
    pub id: String,
    /// Short label drawn on the node
    pub label: String,
    /// Tooltip
    pub title: String,
    /// Kind name of the entity drawn
    pub group: String,
    /// Fill color
    pub color: String,
    /// Renderer shape name
    pub shape: String,
    /// Relative size
    pub size: u32,
}

impl ViewNode {
    pub(crate) fn new(kind: EntityKind, id: NodeId, label: &str, title: String) -> Self {
        let (color, shape, size) = match kind {
            EntityKind::Category => ("#ff6b6b", "box", 25),
            EntityKind::Object => ("#4ecdc4", "circle", 20),
            EntityKind::Morphism => ("#45b7d1", "triangle", 15),
            EntityKind::Functor => ("#96ceb4", "diamond", 22),
            EntityKind::NaturalTransformation => ("#feca57", "star", 18),
            _ => ("#dfe6e9", "ellipse", 12),
        };
        Self {
            id: view_id(kind, id),
            label: label.to_string(),
            title,
            group: kind.name().to_string(),
            color: color.to_string(),
            shape: shape.to_string(),
            size,
        }
    }
}

/// A drawn edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViewEdge {
    /// Id of the start node
    pub from: String,
    /// Id of the end node
    pub to: String,
    /// Label drawn along the edge
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Tooltip
    pub title: String,
    /// What the edge stands for
    pub role: EdgeRole,
    /// Stroke color
    pub color: String,
    /// Stroke width
    pub width: u32,
    /// Whether the stroke is dashed
    pub dashes: bool,
}

impl ViewEdge {
    pub(crate) fn new(role: EdgeRole, from: String, to: String, title: String) -> Self {
        Self {
            from,
            to,
            label: None,
            title,
            role,
            color: role.color().to_string(),
            width: role.width(),
            dashes: role.dashed(),
        }
    }

    pub(crate) fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Nodes, edges and metadata of one projection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ViewModel {
    /// Nodes in creation order
    pub nodes: Vec<ViewNode>,
    /// Edges in creation order
    pub edges: Vec<ViewEdge>,
    /// Counts, names, the mode and possibly an `error`
    pub metadata: BTreeMap<String, Value>,
}

impl ViewModel {
    /// Empty view reporting `error`
    pub fn failed(mode: ViewMode, error: impl fmt::Display) -> Self {
        let mut view = Self::default();
        view.set("mode", mode.as_str());
        view.set("error", error.to_string());
        view
    }

    /// JSON Schema of the view model
    pub fn json_schema() -> RootSchema {
        schema_for!(ViewModel)
    }

    /// Error reported instead of a view, if any
    pub fn error(&self) -> Option<&str> {
        self.metadata.get("error").and_then(Value::as_str)
    }

    /// Ids of all nodes
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    /// Labels of all nodes
    pub fn node_labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|node| node.label.as_str()).collect()
    }

    /// Labels of all edges, skipping unlabelled ones
    pub fn edge_labels(&self) -> Vec<&str> {
        self.edges.iter().filter_map(|edge| edge.label.as_deref()).collect()
    }

    /// Find a node by id
    pub fn node(&self, id: &str) -> Option<&ViewNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub(crate) fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }
}

/// Kind-prefixed id of a drawn entity
pub fn view_id(kind: EntityKind, id: impl Into<NodeId>) -> String {
    let prefix = match kind {
        EntityKind::Category => "cat",
        EntityKind::Object => "obj",
        EntityKind::Morphism => "morph",
        EntityKind::Functor => "func",
        EntityKind::NaturalTransformation => "nt",
        EntityKind::Datatype => "dt",
        EntityKind::ObjectMapping | EntityKind::MorphismMapping => "map",
        EntityKind::Component => "comp",
        EntityKind::Property => "prop",
    };
    format!("{prefix}_{}", id.into())
}

// Copyright 2025 Cowboy AI, LLC.

//! Stored entities of the category graph
//!
//! Morphisms, functors and natural transformations are nodes in their own
//! right rather than plain arrows: they carry names, descriptions and
//! mapping structure that an arrow cannot hold. Each entity records the
//! ids of the entities it is contained in or typed by.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, GraphEntity, Timestamps};
use crate::identifiers::NodeId;
use crate::node_types::EntityKind;

/// Typed id of a [`Category`]
pub type CategoryId = EntityId<Category>;
/// Typed id of an [`Object`]
pub type ObjectId = EntityId<Object>;
/// Typed id of a [`Morphism`]
pub type MorphismId = EntityId<Morphism>;
/// Typed id of a [`Functor`]
pub type FunctorId = EntityId<Functor>;
/// Typed id of a [`NaturalTransformation`]
pub type NaturalTransformationId = EntityId<NaturalTransformation>;
/// Typed id of a [`Datatype`]
pub type DatatypeId = EntityId<Datatype>;

/// Root container of objects and morphisms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Identity
    pub id: CategoryId,
    /// Unique process-wide
    pub name: String,
    /// Free text
    pub description: String,
    /// Lifecycle
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Object of exactly one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    /// Identity
    pub id: ObjectId,
    /// Owning category
    pub category_id: CategoryId,
    /// Unique within the owning category
    pub name: String,
    /// Free text
    pub description: String,
    /// Lifecycle
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Arrow between two objects of its own category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morphism {
    /// Identity
    pub id: MorphismId,
    /// Owning category
    pub category_id: CategoryId,
    /// Domain object
    pub source_id: ObjectId,
    /// Codomain object
    pub target_id: ObjectId,
    /// Unique within the owning category
    pub name: String,
    /// Free text
    pub description: String,
    /// System-managed identity morphism
    pub is_identity: bool,
    /// Lifecycle
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Morphism {
    /// Whether source and target coincide
    pub fn is_endomorphism(&self) -> bool {
        self.source_id == self.target_id
    }
}

/// Map from a source category to a target category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Functor {
    /// Identity
    pub id: FunctorId,
    /// Domain category
    pub source_category_id: CategoryId,
    /// Codomain category
    pub target_category_id: CategoryId,
    /// Display name; several functors may share one
    pub name: String,
    /// Free text
    pub description: String,
    /// Lifecycle
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Map between two functors with the same source and target categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NaturalTransformation {
    /// Identity
    pub id: NaturalTransformationId,
    /// F in α : F ⇒ G
    pub source_functor_id: FunctorId,
    /// G in α : F ⇒ G
    pub target_functor_id: FunctorId,
    /// Display name
    pub name: String,
    /// Free text
    pub description: String,
    /// Lifecycle
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Typed literal attached to objects through property edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datatype {
    /// Identity
    pub id: DatatypeId,
    /// Literal value or type expression
    pub literal: String,
    /// Free text
    pub description: String,
    /// Lifecycle
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Any stored node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A category
    Category(Category),
    /// An object
    Object(Object),
    /// A morphism
    Morphism(Morphism),
    /// A functor
    Functor(Functor),
    /// A natural transformation
    NaturalTransformation(NaturalTransformation),
    /// A datatype
    Datatype(Datatype),
}

impl Node {
    /// Untyped id of the wrapped entity
    pub fn id(&self) -> NodeId {
        match self {
            Node::Category(c) => c.id.node(),
            Node::Object(o) => o.id.node(),
            Node::Morphism(m) => m.id.node(),
            Node::Functor(f) => f.id.node(),
            Node::NaturalTransformation(nt) => nt.id.node(),
            Node::Datatype(d) => d.id.node(),
        }
    }

    /// Kind of the wrapped entity
    pub fn kind(&self) -> EntityKind {
        match self {
            Node::Category(_) => EntityKind::Category,
            Node::Object(_) => EntityKind::Object,
            Node::Morphism(_) => EntityKind::Morphism,
            Node::Functor(_) => EntityKind::Functor,
            Node::NaturalTransformation(_) => EntityKind::NaturalTransformation,
            Node::Datatype(_) => EntityKind::Datatype,
        }
    }

    /// Display name of the wrapped entity
    pub fn name(&self) -> &str {
        match self {
            Node::Category(c) => &c.name,
            Node::Object(o) => &o.name,
            Node::Morphism(m) => &m.name,
            Node::Functor(f) => &f.name,
            Node::NaturalTransformation(nt) => &nt.name,
            Node::Datatype(d) => &d.literal,
        }
    }

    /// Nodes this node is contained in or typed by
    pub fn parents(&self) -> Vec<NodeId> {
        match self {
            Node::Category(_) | Node::Datatype(_) => Vec::new(),
            Node::Object(o) => vec![o.category_id.node()],
            Node::Morphism(m) => vec![
                m.category_id.node(),
                m.source_id.node(),
                m.target_id.node(),
            ],
            Node::Functor(f) => vec![f.source_category_id.node(), f.target_category_id.node()],
            Node::NaturalTransformation(nt) => {
                vec![nt.source_functor_id.node(), nt.target_functor_id.node()]
            }
        }
    }
}

macro_rules! graph_entity {
    ($ty:ident, $variant:ident, $kind:expr, $name:ident) => {
        impl GraphEntity for $ty {
            const KIND: EntityKind = $kind;

            fn id(&self) -> EntityId<Self> {
                self.id
            }

            fn name(&self) -> &str {
                &self.$name
            }

            fn from_node(node: &Node) -> Option<&Self> {
                match node {
                    Node::$variant(entity) => Some(entity),
                    _ => None,
                }
            }

            fn into_node(self) -> Node {
                Node::$variant(self)
            }
        }
    };
}

graph_entity!(Category, Category, EntityKind::Category, name);
graph_entity!(Object, Object, EntityKind::Object, name);
graph_entity!(Morphism, Morphism, EntityKind::Morphism, name);
graph_entity!(Functor, Functor, EntityKind::Functor, name);
graph_entity!(
    NaturalTransformation,
    NaturalTransformation,
    EntityKind::NaturalTransformation,
    name
);
graph_entity!(Datatype, Datatype, EntityKind::Datatype, literal);

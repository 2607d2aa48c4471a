// Copyright 2025 Cowboy AI, LLC.

//! Typed entity identity and lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::identifiers::NodeId;
use crate::model::Node;
use crate::node_types::EntityKind;

/// A typed entity ID using phantom types for type safety
///
/// Every entity is stored under an untyped [`NodeId`]; the phantom parameter
/// keeps a `CategoryId` from being passed where an `ObjectId` is expected.
///
/// # Examples
///
/// ```rust
/// use codices::{CategoryId, NodeId, ObjectId};
///
/// let category = CategoryId::from_node(NodeId::from_raw(1));
/// let object = ObjectId::from_node(NodeId::from_raw(2));
///
/// // These are different types - won't compile if mixed up:
/// // let _: CategoryId = object; // ERROR!
///
/// assert!(category.node() < object.node());
/// ```
pub struct EntityId<T> {
    id: NodeId,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> EntityId<T> {
    /// Wrap an untyped node id
    pub fn from_node(id: NodeId) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying node id
    pub fn node(&self) -> NodeId {
        self.id
    }

    /// Convert to a different entity ID type (use with caution)
    pub fn cast<U>(self) -> EntityId<U> {
        EntityId::from_node(self.id)
    }
}

impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityId").field(&self.id.raw()).finish()
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> From<EntityId<T>> for NodeId {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

impl<T> Serialize for EntityId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.id.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for EntityId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NodeId::deserialize(deserializer).map(EntityId::from_node)
    }
}

/// Creation and update timestamps carried by every entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// When this entity was created
    pub created_at: DateTime<Utc>,
    /// When this entity was last updated
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Stamp a freshly created entity
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::now()
    }
}

/// An entity stored as a node of the graph
pub trait GraphEntity: Clone + fmt::Debug + Sized {
    /// Kind tag of this entity type
    const KIND: EntityKind;

    /// Typed identity
    fn id(&self) -> EntityId<Self>;

    /// Display name (the literal for datatypes)
    fn name(&self) -> &str;

    /// Borrow this entity out of a node, if the node is of this kind
    fn from_node(node: &Node) -> Option<&Self>;

    /// Wrap into a node
    fn into_node(self) -> Node;
}

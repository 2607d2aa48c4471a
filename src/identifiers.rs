// Copyright 2025 Cowboy AI, LLC.

//! Identifier types for graph nodes and transactions

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Node ID - the untyped key of every stored entity
///
/// Ids are allocated from a single monotonic sequence, so ordering by id is
/// ordering by creation across all entity kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Smallest possible id, used as a range bound
    pub const MIN: NodeId = NodeId(0);
    /// Largest possible id, used as a range bound
    pub const MAX: NodeId = NodeId(u64::MAX);

    /// Create from a raw sequence value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw sequence value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NodeId> for u64 {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Transaction ID - identifies one editing session in logs and previews
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// Create a new random transaction ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Copyright 2025 Cowboy AI, LLC.

//! # Codices
//!
//! A transactional graph store for categories, functors and natural
//! transformations.
//!
//! The crate provides:
//! - **Graph Store**: committed tables with an optional staged overlay
//! - **Repositories**: CRUD per entity type, enforcing membership and naming invariants
//! - **Transactions**: begin / commit / rollback with a change log and per-operation undo
//! - **Validation**: advisory structural and law checks with tagged outcomes
//! - **Projections**: renderer-neutral node/edge views, cached per scope and mode
//!
//! ## Storage shape
//!
//! Morphisms, functors and natural transformations are stored as nodes, so
//! the store is shaped like a 2-category. Projections flatten that shape
//! into ordinary diagrams: in `standard` mode a category is drawn with its
//! objects as nodes and its morphisms as edges.
//!
//! [`CategoryWorkspace`] bundles all of the above behind one editing API.

#![warn(missing_docs)]

mod config;
mod entity;
mod errors;
mod identifiers;
mod model;
mod node_types;
mod relationship_types;
mod workspace;

pub mod projection;
pub mod repository;
pub mod store;
pub mod transaction;
pub mod validation;

pub use config::{StorageConfig, WorkspaceConfig, DEFAULT_CACHE_CAPACITY};
pub use entity::{EntityId, GraphEntity, Timestamps};
pub use errors::{CategoryError, CategoryResult, StorageError};
pub use identifiers::{NodeId, TransactionId};
pub use model::{
    Category, CategoryId, Datatype, DatatypeId, Functor, FunctorId, Morphism, MorphismId,
    NaturalTransformation, NaturalTransformationId, Node, Object, ObjectId,
};
pub use node_types::EntityKind;
pub use relationship_types::{Edge, EdgeKey, RelationKind};
pub use workspace::CategoryWorkspace;

pub use projection::{
    build_view, NaturalitySquare, ViewEdge, ViewMode, ViewModel, ViewNode, ViewScope,
};
pub use repository::{EntityPatch, MappingEntry, MorphismPatch, PropertyEntry};
pub use store::{ChangeSet, GraphStatistics, GraphStore, Snapshot};
pub use transaction::{ChangeEntry, Operation, StagedOperation, TransactionManager, TransactionState};
pub use validation::{LawCheck, Outcome};

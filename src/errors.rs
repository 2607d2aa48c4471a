// Copyright 2025 Cowboy AI, LLC.

//! Error types for graph operations

use thiserror::Error;

use crate::identifiers::NodeId;
use crate::node_types::EntityKind;

/// Errors raised by repository and transaction operations
///
/// Validator findings are never reported through this type; they are
/// advisory and come back as plain diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// Referenced entity does not exist in the current snapshot
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: EntityKind,
        /// Id that was searched for
        id: NodeId,
    },

    /// Name already taken in its uniqueness scope
    #[error("{entity} '{name}' already exists in {scope}")]
    NameConflict {
        /// Kind of entity being named
        entity: EntityKind,
        /// The conflicting name
        name: String,
        /// Human readable uniqueness scope
        scope: String,
    },

    /// Name was empty or whitespace
    #[error("{0} name is required")]
    EmptyName(EntityKind),

    /// Endpoint, parent or mapping refers to an entity in the wrong scope
    #[error("Invalid reference: {reason}")]
    InvalidReference {
        /// Why the reference is rejected
        reason: String,
    },

    /// Operation is not permitted on this entity
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Why the operation is rejected
        reason: String,
    },

    /// Transaction call made in the wrong state
    #[error("Cannot {attempted} while transaction is {state}")]
    TransactionState {
        /// Current state name
        state: &'static str,
        /// The rejected call
        attempted: &'static str,
    },

    /// Persistence failed during commit
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures of the persistence backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// File system failure
    #[error("I/O error on {path}: {message}")]
    Io {
        /// Path being read or written
        path: String,
        /// Underlying error message
        message: String,
    },

    /// Encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Any other backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for graph operations
pub type CategoryResult<T> = Result<T, CategoryError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl CategoryError {
    pub(crate) fn not_found(entity: EntityKind, id: impl Into<NodeId>) -> Self {
        CategoryError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub(crate) fn invalid_reference(reason: impl Into<String>) -> Self {
        CategoryError::InvalidReference {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_operation(reason: impl Into<String>) -> Self {
        CategoryError::InvalidOperation {
            reason: reason.into(),
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, CategoryError::NotFound { .. })
    }

    /// Check if this is a naming conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, CategoryError::NameConflict { .. })
    }

    /// Check if this is a scope or typing violation
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, CategoryError::InvalidReference { .. })
    }

    /// Check if this came from the persistence backend
    pub fn is_storage_error(&self) -> bool {
        matches!(self, CategoryError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = CategoryError::NotFound {
            entity: EntityKind::Category,
            id: NodeId::from_raw(42),
        };
        assert_eq!(err.to_string(), "Category not found: 42");

        let err = CategoryError::NameConflict {
            entity: EntityKind::Object,
            name: "A".to_string(),
            scope: "category 'Set'".to_string(),
        };
        assert_eq!(err.to_string(), "Object 'A' already exists in category 'Set'");

        let err = CategoryError::EmptyName(EntityKind::Morphism);
        assert_eq!(err.to_string(), "Morphism name is required");

        let err = CategoryError::TransactionState {
            state: "Active",
            attempted: "begin",
        };
        assert_eq!(err.to_string(), "Cannot begin while transaction is Active");

        let err: CategoryError = StorageError::Backend("disk full".to_string()).into();
        assert_eq!(err.to_string(), "Storage backend error: disk full");
    }

    #[test]
    fn test_error_classification() {
        assert!(CategoryError::not_found(EntityKind::Object, NodeId::from_raw(1)).is_not_found());
        assert!(CategoryError::invalid_reference("x").is_invalid_reference());
        assert!(CategoryError::Storage(StorageError::Serialization("bad".into())).is_storage_error());
        assert!(!CategoryError::invalid_operation("x").is_conflict());
    }

    #[test]
    fn test_json_error_converts_to_storage_error() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let err: StorageError = json_err.into();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}

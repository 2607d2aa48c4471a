// Copyright 2025 Cowboy AI, LLC.

//! Entity repositories
//!
//! One repository per stored entity type. Each checks its preconditions
//! against the current snapshot before staging anything, and expresses
//! identity management and cascades as explicit extra writes on the same
//! batch.

mod cascade;
mod category;
mod datatype;
mod functor;
mod mapping;
mod morphism;
mod natural_transformation;
mod object;

pub use category::{CategoryRepository, NewCategory};
pub use datatype::{DatatypeRepository, NewDatatype};
pub use functor::{FunctorRepository, NewFunctor};
pub use mapping::{
    add_functor_morphism_mapping, add_functor_object_mapping, add_nt_component,
    functor_morphism_mappings, functor_object_mappings, nt_components, properties_of,
    remove_functor_morphism_mapping, remove_functor_object_mapping, remove_nt_component,
    remove_property, set_property, MappingEntry, PropertyEntry,
};
pub use morphism::{MorphismPatch, MorphismRepository, NewMorphism};
pub use natural_transformation::{NaturalTransformationRepository, NewNaturalTransformation};
pub use object::{NewObject, ObjectRepository, DEFAULT_IDENTITY_PREFIX};

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, GraphEntity};
use crate::errors::{CategoryError, CategoryResult};
use crate::node_types::EntityKind;
use crate::store::Snapshot;
use crate::transaction::WriteBatch;

/// CRUD contract shared by every entity type
pub trait EntityRepository {
    /// Stored entity
    type Entity: GraphEntity;
    /// Creation input
    type Draft;
    /// Partial update input
    type Patch;
    /// What `list` is restricted to
    type Scope;

    /// Validate and stage a new entity
    fn create(&self, batch: &mut WriteBatch<'_>, draft: Self::Draft) -> CategoryResult<EntityId<Self::Entity>>;

    /// Fetch one entity
    fn get(&self, snapshot: &Snapshot<'_>, id: EntityId<Self::Entity>) -> CategoryResult<Self::Entity> {
        require(snapshot, id).cloned()
    }

    /// Entities in scope, in creation order
    fn list(&self, snapshot: &Snapshot<'_>, scope: Self::Scope) -> Vec<Self::Entity>;

    /// Apply a partial update
    fn update(
        &self,
        batch: &mut WriteBatch<'_>,
        id: EntityId<Self::Entity>,
        patch: Self::Patch,
    ) -> CategoryResult<Self::Entity>;

    /// Delete the entity and everything that cannot exist without it
    fn delete(&self, batch: &mut WriteBatch<'_>, id: EntityId<Self::Entity>) -> CategoryResult<()>;
}

/// Partial update of a name and description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPatch {
    /// New name (the literal for datatypes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntityPatch {
    /// Patch that renames
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    /// Patch that replaces the description
    pub fn describe(description: impl Into<String>) -> Self {
        Self {
            name: None,
            description: Some(description.into()),
        }
    }

    /// Also replace the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Look up an entity or fail with `NotFound`
pub(crate) fn require<'s, E: GraphEntity>(snapshot: &Snapshot<'s>, id: EntityId<E>) -> CategoryResult<&'s E> {
    snapshot
        .get(id)
        .ok_or_else(|| CategoryError::not_found(E::KIND, id))
}

/// Trimmed name, or `EmptyName`
pub(crate) fn require_name(kind: EntityKind, name: &str) -> CategoryResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CategoryError::EmptyName(kind));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("" ; "empty")]
    #[test_case("   " ; "whitespace")]
    fn test_blank_names_are_rejected(name: &str) {
        assert_eq!(
            require_name(EntityKind::Object, name),
            Err(CategoryError::EmptyName(EntityKind::Object))
        );
    }

    #[test]
    fn test_names_are_trimmed_but_keep_case() {
        assert_eq!(require_name(EntityKind::Category, "  Sets ").unwrap(), "Sets");
    }

    #[test]
    fn test_patch_builders() {
        let patch = EntityPatch::rename("B").with_description("second");
        assert_eq!(patch.name.as_deref(), Some("B"));
        assert_eq!(patch.description.as_deref(), Some("second"));
        assert!(EntityPatch::describe("x").name.is_none());
    }
}

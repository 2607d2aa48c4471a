// Copyright 2025 Cowboy AI, LLC.

//! Morphism repository

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::{GraphEntity, Timestamps};
use crate::errors::{CategoryError, CategoryResult};
use crate::model::{Category, CategoryId, Morphism, MorphismId, Object, ObjectId};
use crate::store::Snapshot;
use crate::transaction::WriteBatch;

use super::cascade;
use super::{require, require_name, EntityRepository};

/// Input for creating a morphism
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMorphism {
    /// Owning category
    pub category_id: CategoryId,
    /// Unique within the category
    pub name: String,
    /// Domain object, must belong to the category
    pub source_id: ObjectId,
    /// Codomain object, must belong to the category
    pub target_id: ObjectId,
    /// Free text
    #[serde(default)]
    pub description: String,
}

impl NewMorphism {
    /// Morphism `name : source -> target` in `category_id`
    pub fn new(category_id: CategoryId, name: impl Into<String>, source_id: ObjectId, target_id: ObjectId) -> Self {
        Self {
            category_id,
            name: name.into(),
            source_id,
            target_id,
            description: String::new(),
        }
    }
}

/// Partial update of a morphism
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphismPatch {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New domain object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<ObjectId>,
    /// New codomain object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<ObjectId>,
}

/// User morphisms; identity morphisms are managed by [`super::ObjectRepository`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MorphismRepository;

impl MorphismRepository {
    fn endpoint<'s>(snapshot: &Snapshot<'s>, category: &Category, id: ObjectId, role: &str) -> CategoryResult<&'s Object> {
        let object = require(snapshot, id)?;
        if object.category_id != category.id {
            return Err(CategoryError::invalid_reference(format!(
                "{role} object '{}' is not in category '{}'",
                object.name, category.name
            )));
        }
        Ok(object)
    }

    fn ensure_unique(
        snapshot: &Snapshot<'_>,
        category: &Category,
        name: &str,
        except: Option<MorphismId>,
    ) -> CategoryResult<()> {
        match snapshot.morphism_by_name(category.id, name) {
            Some(existing) if Some(existing.id) != except => Err(CategoryError::NameConflict {
                entity: Morphism::KIND,
                name: name.to_string(),
                scope: format!("category '{}'", category.name),
            }),
            _ => Ok(()),
        }
    }

    fn user_morphism(snapshot: &Snapshot<'_>, id: MorphismId, action: &str) -> CategoryResult<Morphism> {
        let morphism = require(snapshot, id)?;
        if morphism.is_identity {
            return Err(CategoryError::invalid_operation(format!(
                "cannot {action} identity morphism '{}'; it follows its object",
                morphism.name
            )));
        }
        Ok(morphism.clone())
    }
}

impl EntityRepository for MorphismRepository {
    type Entity = Morphism;
    type Draft = NewMorphism;
    type Patch = MorphismPatch;
    type Scope = CategoryId;

    fn create(&self, batch: &mut WriteBatch<'_>, draft: NewMorphism) -> CategoryResult<MorphismId> {
        let name = {
            let snapshot = batch.snapshot();
            let category = require(&snapshot, draft.category_id)?;
            Self::endpoint(&snapshot, category, draft.source_id, "source")?;
            Self::endpoint(&snapshot, category, draft.target_id, "target")?;
            let name = require_name(Morphism::KIND, &draft.name)?;
            Self::ensure_unique(&snapshot, category, &name, None)?;
            name
        };

        let id = MorphismId::from_node(batch.allocate_id());
        batch.put(Morphism {
            id,
            category_id: draft.category_id,
            source_id: draft.source_id,
            target_id: draft.target_id,
            name: name.clone(),
            description: draft.description,
            is_identity: false,
            timestamps: Timestamps::now(),
        });
        info!(
            morphism_id = %id,
            source_id = %draft.source_id,
            target_id = %draft.target_id,
            name = %name,
            "Created morphism"
        );
        Ok(id)
    }

    fn list(&self, snapshot: &Snapshot<'_>, category: CategoryId) -> Vec<Morphism> {
        snapshot.morphisms_in(category).into_iter().cloned().collect()
    }

    fn update(&self, batch: &mut WriteBatch<'_>, id: MorphismId, patch: MorphismPatch) -> CategoryResult<Morphism> {
        let mut morphism = Self::user_morphism(&batch.snapshot(), id, "update")?;
        {
            let snapshot = batch.snapshot();
            let category = require(&snapshot, morphism.category_id)?;
            if let Some(name) = &patch.name {
                let name = require_name(Morphism::KIND, name)?;
                Self::ensure_unique(&snapshot, category, &name, Some(id))?;
                morphism.name = name;
            }
            if let Some(source) = patch.source_id {
                morphism.source_id = Self::endpoint(&snapshot, category, source, "source")?.id;
            }
            if let Some(target) = patch.target_id {
                morphism.target_id = Self::endpoint(&snapshot, category, target, "target")?.id;
            }
        }
        if let Some(description) = patch.description {
            morphism.description = description;
        }
        morphism.timestamps.touch();
        batch.put(morphism.clone());
        Ok(morphism)
    }

    fn delete(&self, batch: &mut WriteBatch<'_>, id: MorphismId) -> CategoryResult<()> {
        let morphism = Self::user_morphism(&batch.snapshot(), id, "delete")?;
        cascade::remove_morphism(batch, id);
        info!(morphism_id = %id, name = %morphism.name, "Deleted morphism");
        Ok(())
    }
}

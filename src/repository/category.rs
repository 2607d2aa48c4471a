// Copyright 2025 Cowboy AI, LLC.

//! Category repository

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::{GraphEntity, Timestamps};
use crate::errors::{CategoryError, CategoryResult};
use crate::model::{Category, CategoryId, FunctorId, MorphismId, ObjectId};
use crate::store::Snapshot;
use crate::transaction::WriteBatch;

use super::cascade;
use super::{require, require_name, EntityPatch, EntityRepository};

/// Input for creating a category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    /// Unique process-wide
    pub name: String,
    /// Free text
    #[serde(default)]
    pub description: String,
}

impl NewCategory {
    /// Category named `name` with no description
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }
}

/// Categories are the root containers; names are unique across the store
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryRepository;

impl CategoryRepository {
    fn ensure_unique(snapshot: &Snapshot<'_>, name: &str, except: Option<CategoryId>) -> CategoryResult<()> {
        match snapshot.category_by_name(name) {
            Some(existing) if Some(existing.id) != except => Err(CategoryError::NameConflict {
                entity: Category::KIND,
                name: name.to_string(),
                scope: "the workspace".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl EntityRepository for CategoryRepository {
    type Entity = Category;
    type Draft = NewCategory;
    type Patch = EntityPatch;
    type Scope = ();

    fn create(&self, batch: &mut WriteBatch<'_>, draft: NewCategory) -> CategoryResult<CategoryId> {
        let name = require_name(Category::KIND, &draft.name)?;
        Self::ensure_unique(&batch.snapshot(), &name, None)?;

        let id = CategoryId::from_node(batch.allocate_id());
        batch.put(Category {
            id,
            name: name.clone(),
            description: draft.description,
            timestamps: Timestamps::now(),
        });
        info!(category_id = %id, name = %name, "Created category");
        Ok(id)
    }

    fn list(&self, snapshot: &Snapshot<'_>, _scope: ()) -> Vec<Category> {
        snapshot.categories().into_iter().cloned().collect()
    }

    fn update(&self, batch: &mut WriteBatch<'_>, id: CategoryId, patch: EntityPatch) -> CategoryResult<Category> {
        let mut category = require(&batch.snapshot(), id)?.clone();
        if let Some(name) = patch.name {
            let name = require_name(Category::KIND, &name)?;
            Self::ensure_unique(&batch.snapshot(), &name, Some(id))?;
            category.name = name;
        }
        if let Some(description) = patch.description {
            category.description = description;
        }
        category.timestamps.touch();
        batch.put(category.clone());
        Ok(category)
    }

    fn delete(&self, batch: &mut WriteBatch<'_>, id: CategoryId) -> CategoryResult<()> {
        let (name, functors, morphisms, objects) = {
            let snapshot = batch.snapshot();
            let category = require(&snapshot, id)?;
            (
                category.name.clone(),
                snapshot.functors_on(id).iter().map(|f| f.id).collect::<Vec<FunctorId>>(),
                snapshot.morphisms_in(id).iter().map(|m| m.id).collect::<Vec<MorphismId>>(),
                snapshot.objects_in(id).iter().map(|o| o.id).collect::<Vec<ObjectId>>(),
            )
        };

        batch.remove_node(id);
        for functor in functors {
            cascade::remove_functor(batch, functor);
        }
        for morphism in morphisms {
            cascade::remove_morphism(batch, morphism);
        }
        for object in objects {
            cascade::remove_object(batch, object);
        }
        info!(category_id = %id, name = %name, "Deleted category");
        Ok(())
    }
}

// Copyright 2025 Cowboy AI, LLC.

//! Natural transformation repository

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::{GraphEntity, Timestamps};
use crate::errors::{CategoryError, CategoryResult};
use crate::model::{FunctorId, NaturalTransformation, NaturalTransformationId};
use crate::store::Snapshot;
use crate::transaction::WriteBatch;

use super::cascade;
use super::{require, require_name, EntityPatch, EntityRepository};

/// Input for creating a natural transformation α : F ⇒ G
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNaturalTransformation {
    /// F
    pub source_functor_id: FunctorId,
    /// G
    pub target_functor_id: FunctorId,
    /// Display name
    pub name: String,
    /// Free text
    #[serde(default)]
    pub description: String,
}

impl NewNaturalTransformation {
    /// `name : source ⇒ target`
    pub fn new(name: impl Into<String>, source_functor_id: FunctorId, target_functor_id: FunctorId) -> Self {
        Self {
            source_functor_id,
            target_functor_id,
            name: name.into(),
            description: String::new(),
        }
    }
}

/// Natural transformations between parallel functors
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalTransformationRepository;

impl EntityRepository for NaturalTransformationRepository {
    type Entity = NaturalTransformation;
    type Draft = NewNaturalTransformation;
    type Patch = EntityPatch;
    type Scope = ();

    fn create(&self, batch: &mut WriteBatch<'_>, draft: NewNaturalTransformation) -> CategoryResult<NaturalTransformationId> {
        let name = require_name(NaturalTransformation::KIND, &draft.name)?;
        {
            let snapshot = batch.snapshot();
            let source = require(&snapshot, draft.source_functor_id)?;
            let target = require(&snapshot, draft.target_functor_id)?;
            if source.source_category_id != target.source_category_id
                || source.target_category_id != target.target_category_id
            {
                return Err(CategoryError::invalid_reference(format!(
                    "functors '{}' and '{}' do not share source and target categories",
                    source.name, target.name
                )));
            }
        }

        let id = NaturalTransformationId::from_node(batch.allocate_id());
        batch.put(NaturalTransformation {
            id,
            source_functor_id: draft.source_functor_id,
            target_functor_id: draft.target_functor_id,
            name: name.clone(),
            description: draft.description,
            timestamps: Timestamps::now(),
        });
        info!(nt_id = %id, name = %name, "Created natural transformation");
        Ok(id)
    }

    fn list(&self, snapshot: &Snapshot<'_>, _scope: ()) -> Vec<NaturalTransformation> {
        snapshot.natural_transformations().into_iter().cloned().collect()
    }

    fn update(
        &self,
        batch: &mut WriteBatch<'_>,
        id: NaturalTransformationId,
        patch: EntityPatch,
    ) -> CategoryResult<NaturalTransformation> {
        let mut nt = require(&batch.snapshot(), id)?.clone();
        if let Some(name) = patch.name {
            nt.name = require_name(NaturalTransformation::KIND, &name)?;
        }
        if let Some(description) = patch.description {
            nt.description = description;
        }
        nt.timestamps.touch();
        batch.put(nt.clone());
        Ok(nt)
    }

    fn delete(&self, batch: &mut WriteBatch<'_>, id: NaturalTransformationId) -> CategoryResult<()> {
        let name = require(&batch.snapshot(), id)?.name.clone();
        cascade::remove_natural_transformation(batch, id);
        info!(nt_id = %id, name = %name, "Deleted natural transformation");
        Ok(())
    }
}

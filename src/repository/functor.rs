// Copyright 2025 Cowboy AI, LLC.

//! Functor repository

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::{GraphEntity, Timestamps};
use crate::errors::CategoryResult;
use crate::model::{CategoryId, Functor, FunctorId};
use crate::store::Snapshot;
use crate::transaction::WriteBatch;

use super::cascade;
use super::{require, require_name, EntityPatch, EntityRepository};

/// Input for creating a functor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFunctor {
    /// Domain category
    pub source_category_id: CategoryId,
    /// Codomain category
    pub target_category_id: CategoryId,
    /// Display name
    pub name: String,
    /// Free text
    #[serde(default)]
    pub description: String,
}

impl NewFunctor {
    /// Functor `name : source -> target`
    pub fn new(name: impl Into<String>, source_category_id: CategoryId, target_category_id: CategoryId) -> Self {
        Self {
            source_category_id,
            target_category_id,
            name: name.into(),
            description: String::new(),
        }
    }
}

/// Functors between categories; names need not be unique
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctorRepository;

impl EntityRepository for FunctorRepository {
    type Entity = Functor;
    type Draft = NewFunctor;
    type Patch = EntityPatch;
    type Scope = ();

    fn create(&self, batch: &mut WriteBatch<'_>, draft: NewFunctor) -> CategoryResult<FunctorId> {
        let name = require_name(Functor::KIND, &draft.name)?;
        {
            let snapshot = batch.snapshot();
            require(&snapshot, draft.source_category_id)?;
            require(&snapshot, draft.target_category_id)?;
        }

        let id = FunctorId::from_node(batch.allocate_id());
        batch.put(Functor {
            id,
            source_category_id: draft.source_category_id,
            target_category_id: draft.target_category_id,
            name: name.clone(),
            description: draft.description,
            timestamps: Timestamps::now(),
        });
        info!(
            functor_id = %id,
            source = %draft.source_category_id,
            target = %draft.target_category_id,
            name = %name,
            "Created functor"
        );
        Ok(id)
    }

    fn list(&self, snapshot: &Snapshot<'_>, _scope: ()) -> Vec<Functor> {
        snapshot.functors().into_iter().cloned().collect()
    }

    fn update(&self, batch: &mut WriteBatch<'_>, id: FunctorId, patch: EntityPatch) -> CategoryResult<Functor> {
        let mut functor = require(&batch.snapshot(), id)?.clone();
        if let Some(name) = patch.name {
            functor.name = require_name(Functor::KIND, &name)?;
        }
        if let Some(description) = patch.description {
            functor.description = description;
        }
        functor.timestamps.touch();
        batch.put(functor.clone());
        Ok(functor)
    }

    fn delete(&self, batch: &mut WriteBatch<'_>, id: FunctorId) -> CategoryResult<()> {
        let name = require(&batch.snapshot(), id)?.name.clone();
        cascade::remove_functor(batch, id);
        info!(functor_id = %id, name = %name, "Deleted functor");
        Ok(())
    }
}

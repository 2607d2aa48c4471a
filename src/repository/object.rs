// Copyright 2025 Cowboy AI, LLC.

//! Object repository
//!
//! Every object owns exactly one identity morphism, named with a fixed
//! prefix followed by the object name. The pair is created, renamed and
//! deleted together.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::{GraphEntity, Timestamps};
use crate::errors::{CategoryError, CategoryResult};
use crate::model::{Category, CategoryId, Morphism, MorphismId, Object, ObjectId};
use crate::store::Snapshot;
use crate::transaction::WriteBatch;

use super::cascade;
use super::{require, require_name, EntityPatch, EntityRepository};

/// Name prefix of identity morphisms unless configured otherwise
pub const DEFAULT_IDENTITY_PREFIX: &str = "id_";

/// Input for creating an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewObject {
    /// Owning category
    pub category_id: CategoryId,
    /// Unique within the category
    pub name: String,
    /// Free text
    #[serde(default)]
    pub description: String,
}

impl NewObject {
    /// Object named `name` in `category_id`
    pub fn new(category_id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            category_id,
            name: name.into(),
            description: String::new(),
        }
    }
}

/// Objects and their identity morphisms
#[derive(Debug, Clone)]
pub struct ObjectRepository {
    identity_prefix: String,
}

impl Default for ObjectRepository {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTITY_PREFIX)
    }
}

impl ObjectRepository {
    /// Repository naming identities `<prefix><object>`
    pub fn new(identity_prefix: impl Into<String>) -> Self {
        Self {
            identity_prefix: identity_prefix.into(),
        }
    }

    /// Name of the identity morphism of an object called `object_name`
    pub fn identity_name(&self, object_name: &str) -> String {
        format!("{}{}", self.identity_prefix, object_name)
    }

    fn check_names(
        &self,
        snapshot: &Snapshot<'_>,
        category: &Category,
        name: &str,
        except: Option<ObjectId>,
    ) -> CategoryResult<()> {
        if let Some(existing) = snapshot.object_by_name(category.id, name) {
            if Some(existing.id) != except {
                return Err(CategoryError::NameConflict {
                    entity: Object::KIND,
                    name: name.to_string(),
                    scope: format!("category '{}'", category.name),
                });
            }
        }

        let identity = self.identity_name(name);
        if let Some(existing) = snapshot.morphism_by_name(category.id, &identity) {
            let owned_by_self = existing.is_identity && except.is_some_and(|id| existing.source_id == id);
            if !owned_by_self {
                return Err(CategoryError::NameConflict {
                    entity: Morphism::KIND,
                    name: identity,
                    scope: format!("category '{}'", category.name),
                });
            }
        }
        Ok(())
    }
}

impl EntityRepository for ObjectRepository {
    type Entity = Object;
    type Draft = NewObject;
    type Patch = EntityPatch;
    type Scope = CategoryId;

    fn create(&self, batch: &mut WriteBatch<'_>, draft: NewObject) -> CategoryResult<ObjectId> {
        let category = require(&batch.snapshot(), draft.category_id)?.clone();
        let name = require_name(Object::KIND, &draft.name)?;
        self.check_names(&batch.snapshot(), &category, &name, None)?;

        let id = ObjectId::from_node(batch.allocate_id());
        batch.put(Object {
            id,
            category_id: category.id,
            name: name.clone(),
            description: draft.description,
            timestamps: Timestamps::now(),
        });

        let identity = MorphismId::from_node(batch.allocate_id());
        batch.put(Morphism {
            id: identity,
            category_id: category.id,
            source_id: id,
            target_id: id,
            name: self.identity_name(&name),
            description: format!("Identity morphism on {name}"),
            is_identity: true,
            timestamps: Timestamps::now(),
        });

        info!(
            object_id = %id,
            identity_id = %identity,
            category = %category.name,
            name = %name,
            "Created object"
        );
        Ok(id)
    }

    fn list(&self, snapshot: &Snapshot<'_>, category: CategoryId) -> Vec<Object> {
        snapshot.objects_in(category).into_iter().cloned().collect()
    }

    fn update(&self, batch: &mut WriteBatch<'_>, id: ObjectId, patch: EntityPatch) -> CategoryResult<Object> {
        let mut object = require(&batch.snapshot(), id)?.clone();
        let renamed = match patch.name {
            Some(name) => {
                let name = require_name(Object::KIND, &name)?;
                let category = require(&batch.snapshot(), object.category_id)?.clone();
                self.check_names(&batch.snapshot(), &category, &name, Some(id))?;
                let changed = name != object.name;
                object.name = name;
                changed
            }
            None => false,
        };
        if let Some(description) = patch.description {
            object.description = description;
        }
        object.timestamps.touch();
        batch.put(object.clone());

        if renamed {
            let identities: Vec<Morphism> = batch
                .snapshot()
                .identities_of(id)
                .into_iter()
                .cloned()
                .collect();
            for mut identity in identities {
                identity.name = self.identity_name(&object.name);
                identity.description = format!("Identity morphism on {}", object.name);
                identity.timestamps.touch();
                batch.put(identity);
            }
        }
        Ok(object)
    }

    fn delete(&self, batch: &mut WriteBatch<'_>, id: ObjectId) -> CategoryResult<()> {
        let name = require(&batch.snapshot(), id)?.name.clone();
        cascade::remove_object(batch, id);
        info!(object_id = %id, name = %name, "Deleted object");
        Ok(())
    }
}

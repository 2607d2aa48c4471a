// Copyright 2025 Cowboy AI, LLC.

//! Datatype repository

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::{GraphEntity, Timestamps};
use crate::errors::CategoryResult;
use crate::model::{Datatype, DatatypeId};
use crate::store::Snapshot;
use crate::transaction::WriteBatch;

use super::cascade;
use super::{require, require_name, EntityPatch, EntityRepository};

/// Input for creating a datatype
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDatatype {
    /// Literal value or type expression
    pub literal: String,
    /// Free text
    #[serde(default)]
    pub description: String,
}

impl NewDatatype {
    /// Datatype holding `literal`
    pub fn literal(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            description: String::new(),
        }
    }
}

/// Datatypes referenced by object properties
#[derive(Debug, Clone, Copy, Default)]
pub struct DatatypeRepository;

impl EntityRepository for DatatypeRepository {
    type Entity = Datatype;
    type Draft = NewDatatype;
    type Patch = EntityPatch;
    type Scope = ();

    fn create(&self, batch: &mut WriteBatch<'_>, draft: NewDatatype) -> CategoryResult<DatatypeId> {
        let literal = require_name(Datatype::KIND, &draft.literal)?;
        let id = DatatypeId::from_node(batch.allocate_id());
        batch.put(Datatype {
            id,
            literal: literal.clone(),
            description: draft.description,
            timestamps: Timestamps::now(),
        });
        info!(datatype_id = %id, literal = %literal, "Created datatype");
        Ok(id)
    }

    fn list(&self, snapshot: &Snapshot<'_>, _scope: ()) -> Vec<Datatype> {
        snapshot.datatypes().into_iter().cloned().collect()
    }

    fn update(&self, batch: &mut WriteBatch<'_>, id: DatatypeId, patch: EntityPatch) -> CategoryResult<Datatype> {
        let mut datatype = require(&batch.snapshot(), id)?.clone();
        if let Some(literal) = patch.name {
            datatype.literal = require_name(Datatype::KIND, &literal)?;
        }
        if let Some(description) = patch.description {
            datatype.description = description;
        }
        datatype.timestamps.touch();
        batch.put(datatype.clone());
        Ok(datatype)
    }

    fn delete(&self, batch: &mut WriteBatch<'_>, id: DatatypeId) -> CategoryResult<()> {
        require(&batch.snapshot(), id)?;
        cascade::remove_datatype(batch, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CategoryError;
    use crate::node_types::EntityKind;
    use crate::store::GraphStore;
    use crate::transaction::TransactionManager;

    #[test]
    fn test_literal_is_required() {
        let mut tx = TransactionManager::new(GraphStore::in_memory());
        let err = tx
            .execute(|b| DatatypeRepository.create(b, NewDatatype::literal(" ")))
            .unwrap_err();
        assert_eq!(err, CategoryError::EmptyName(EntityKind::Datatype));
    }

    #[test]
    fn test_update_literal() {
        let mut tx = TransactionManager::new(GraphStore::in_memory());
        let (id, _) = tx
            .execute(|b| DatatypeRepository.create(b, NewDatatype::literal("u32")))
            .unwrap();
        let (updated, _) = tx
            .execute(|b| DatatypeRepository.update(b, id, EntityPatch::rename("u64")))
            .unwrap();
        assert_eq!(updated.literal, "u64");
        assert_eq!(DatatypeRepository.list(&tx.snapshot(), ()).len(), 1);
    }
}

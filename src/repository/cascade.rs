// Copyright 2025 Cowboy AI, LLC.

//! Cascade deletes shared by the repositories
//!
//! None of these check preconditions; callers have already resolved the
//! entity and decided it may go. The entity's own row is always the first
//! write, so it heads the staged operation.

use std::collections::BTreeSet;

use tracing::debug;

use crate::identifiers::NodeId;
use crate::model::{DatatypeId, FunctorId, MorphismId, NaturalTransformationId, ObjectId};
use crate::relationship_types::RelationKind;
use crate::transaction::WriteBatch;

/// Remove every stored edge owned by, sourced at or pointing to `id`
pub(crate) fn remove_edges_mentioning(batch: &mut WriteBatch<'_>, id: NodeId) -> usize {
    let keys = batch.snapshot().edges_mentioning(id);
    let removed = keys.len();
    for key in keys {
        batch.remove_edge(key);
    }
    removed
}

/// Remove a morphism and the mapping edges that mention it
pub(crate) fn remove_morphism(batch: &mut WriteBatch<'_>, id: MorphismId) {
    batch.remove_node(id);
    let edges = remove_edges_mentioning(batch, id.node());
    debug!(morphism_id = %id, edges, "Removed morphism");
}

/// Remove an object, its morphisms, its edges and datatypes left unused
pub(crate) fn remove_object(batch: &mut WriteBatch<'_>, id: ObjectId) {
    let (morphisms, datatypes): (Vec<MorphismId>, BTreeSet<DatatypeId>) = {
        let snapshot = batch.snapshot();
        (
            snapshot.morphisms_touching(id).iter().map(|m| m.id).collect(),
            snapshot.properties(id).iter().map(|p| p.datatype_id).collect(),
        )
    };
    batch.remove_node(id);
    for morphism in morphisms {
        remove_morphism(batch, morphism);
    }
    remove_edges_mentioning(batch, id.node());

    for datatype in datatypes {
        let still_used = batch
            .snapshot()
            .edges()
            .iter()
            .any(|(key, _)| key.kind == RelationKind::Property && key.from == datatype.node());
        if !still_used && batch.snapshot().get(datatype).is_some() {
            batch.remove_node(datatype);
            debug!(datatype_id = %datatype, "Removed orphaned datatype");
        }
    }
    debug!(object_id = %id, "Removed object");
}

/// Remove a natural transformation and its components
pub(crate) fn remove_natural_transformation(batch: &mut WriteBatch<'_>, id: NaturalTransformationId) {
    batch.remove_node(id);
    remove_edges_mentioning(batch, id.node());
    debug!(nt_id = %id, "Removed natural transformation");
}

/// Remove a functor, the natural transformations typed on it and its mappings
pub(crate) fn remove_functor(batch: &mut WriteBatch<'_>, id: FunctorId) {
    let transformations: Vec<NaturalTransformationId> = batch
        .snapshot()
        .natural_transformations_on(id)
        .iter()
        .map(|nt| nt.id)
        .collect();
    batch.remove_node(id);
    for nt in transformations {
        remove_natural_transformation(batch, nt);
    }
    remove_edges_mentioning(batch, id.node());
    debug!(functor_id = %id, "Removed functor");
}

/// Remove a datatype and the property edges pointing at it
pub(crate) fn remove_datatype(batch: &mut WriteBatch<'_>, id: DatatypeId) {
    batch.remove_node(id);
    remove_edges_mentioning(batch, id.node());
    debug!(datatype_id = %id, "Removed datatype");
}

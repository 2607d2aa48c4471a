// Copyright 2025 Cowboy AI, LLC.

//! Functor maps, natural transformation components and object properties
//!
//! These are stored edges rather than nodes. Adding an entry for a source
//! that is already mapped replaces the previous target.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{CategoryError, CategoryResult};
use crate::identifiers::NodeId;
use crate::model::{
    Category, CategoryId, DatatypeId, Functor, FunctorId, Morphism, MorphismId, NaturalTransformationId,
    Object, ObjectId,
};
use crate::node_types::EntityKind;
use crate::relationship_types::{Edge, EdgeKey, RelationKind};
use crate::store::Snapshot;
use crate::transaction::WriteBatch;

use super::{require, require_name};

/// One resolved mapping or component entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Mapped source id
    pub source_id: NodeId,
    /// Mapped source name
    pub source_name: String,
    /// Mapped target id
    pub target_id: NodeId,
    /// Mapped target name
    pub target_name: String,
}

/// One resolved property of an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    /// Field name
    pub field_name: String,
    /// Attached datatype
    pub datatype_id: DatatypeId,
    /// Literal of the datatype
    pub literal: String,
}

fn member_object<'s>(snapshot: &Snapshot<'s>, id: ObjectId, category: CategoryId, role: &str) -> CategoryResult<&'s Object> {
    let object = require(snapshot, id)?;
    if object.category_id != category {
        let category = require(snapshot, category)?;
        return Err(not_in_category(role, "object", &object.name, category));
    }
    Ok(object)
}

fn member_morphism<'s>(
    snapshot: &Snapshot<'s>,
    id: MorphismId,
    category: CategoryId,
    role: &str,
) -> CategoryResult<&'s Morphism> {
    let morphism = require(snapshot, id)?;
    if morphism.category_id != category {
        let category = require(snapshot, category)?;
        return Err(not_in_category(role, "morphism", &morphism.name, category));
    }
    Ok(morphism)
}

fn not_in_category(role: &str, what: &str, name: &str, category: &Category) -> CategoryError {
    CategoryError::invalid_reference(format!(
        "{role} {what} '{name}' is not in category '{}'",
        category.name
    ))
}

fn remove_owned_edge(
    batch: &mut WriteBatch<'_>,
    kind: RelationKind,
    owner: NodeId,
    from: NodeId,
    entity: EntityKind,
) -> CategoryResult<()> {
    let key = EdgeKey::new(kind, owner, from);
    if batch.snapshot().edge(&key).is_none() {
        return Err(CategoryError::not_found(entity, from));
    }
    batch.remove_edge(key);
    debug!(kind = %kind, owner = %owner, from = %from, "Removed edge");
    Ok(())
}

fn resolve(snapshot: &Snapshot<'_>, kind: RelationKind, owner: NodeId) -> Vec<MappingEntry> {
    let name_of = |id: NodeId| {
        snapshot
            .node(id)
            .map(|node| node.name().to_string())
            .unwrap_or_default()
    };
    snapshot
        .owned_edges(kind, owner)
        .into_iter()
        .map(|(key, edge)| MappingEntry {
            source_id: key.from,
            source_name: name_of(key.from),
            target_id: edge.to,
            target_name: name_of(edge.to),
        })
        .collect()
}

/// Map a source-category object to a target-category object
pub fn add_functor_object_mapping(
    batch: &mut WriteBatch<'_>,
    functor: FunctorId,
    source: ObjectId,
    target: ObjectId,
) -> CategoryResult<()> {
    {
        let snapshot = batch.snapshot();
        let f = require(&snapshot, functor)?;
        member_object(&snapshot, source, f.source_category_id, "source")?;
        member_object(&snapshot, target, f.target_category_id, "target")?;
    }
    batch.put_edge(
        EdgeKey::new(RelationKind::ObjectMapping, functor, source),
        Edge::to(target),
    );
    info!(functor_id = %functor, source = %source, target = %target, "Mapped object");
    Ok(())
}

/// Map a source-category morphism to a target-category morphism
pub fn add_functor_morphism_mapping(
    batch: &mut WriteBatch<'_>,
    functor: FunctorId,
    source: MorphismId,
    target: MorphismId,
) -> CategoryResult<()> {
    {
        let snapshot = batch.snapshot();
        let f = require(&snapshot, functor)?;
        member_morphism(&snapshot, source, f.source_category_id, "source")?;
        member_morphism(&snapshot, target, f.target_category_id, "target")?;
    }
    batch.put_edge(
        EdgeKey::new(RelationKind::MorphismMapping, functor, source),
        Edge::to(target),
    );
    info!(functor_id = %functor, source = %source, target = %target, "Mapped morphism");
    Ok(())
}

/// Drop the object-map entry for `source`
pub fn remove_functor_object_mapping(batch: &mut WriteBatch<'_>, functor: FunctorId, source: ObjectId) -> CategoryResult<()> {
    require(&batch.snapshot(), functor)?;
    remove_owned_edge(
        batch,
        RelationKind::ObjectMapping,
        functor.node(),
        source.node(),
        EntityKind::ObjectMapping,
    )
}

/// Drop the morphism-map entry for `source`
pub fn remove_functor_morphism_mapping(
    batch: &mut WriteBatch<'_>,
    functor: FunctorId,
    source: MorphismId,
) -> CategoryResult<()> {
    require(&batch.snapshot(), functor)?;
    remove_owned_edge(
        batch,
        RelationKind::MorphismMapping,
        functor.node(),
        source.node(),
        EntityKind::MorphismMapping,
    )
}

fn mismatch(component: &str, end: &str, functor: &Functor, object: &str) -> CategoryError {
    CategoryError::invalid_reference(format!(
        "component '{component}' {end} must be {}({object})",
        functor.name
    ))
}

/// Set the component α_X of a natural transformation α : F ⇒ G
///
/// X must be an object of the shared source category and the component a
/// morphism of the shared target category. Its source must be F(X) and its
/// target G(X) wherever those images are mapped.
pub fn add_nt_component(
    batch: &mut WriteBatch<'_>,
    nt: NaturalTransformationId,
    object: ObjectId,
    component: MorphismId,
) -> CategoryResult<()> {
    {
        let snapshot = batch.snapshot();
        let alpha = require(&snapshot, nt)?;
        let f = require(&snapshot, alpha.source_functor_id)?;
        let g = require(&snapshot, alpha.target_functor_id)?;
        let x = member_object(&snapshot, object, f.source_category_id, "component")?;
        let m = member_morphism(&snapshot, component, f.target_category_id, "component")?;

        let fx = snapshot.object_map(f.id).get(&object).copied();
        let gx = snapshot.object_map(g.id).get(&object).copied();
        if fx.is_some_and(|fx| fx != m.source_id) {
            return Err(mismatch(&m.name, "source", f, &x.name));
        }
        if gx.is_some_and(|gx| gx != m.target_id) {
            return Err(mismatch(&m.name, "target", g, &x.name));
        }
    }
    batch.put_edge(EdgeKey::new(RelationKind::Component, nt, object), Edge::to(component));
    info!(nt_id = %nt, object = %object, component = %component, "Set component");
    Ok(())
}

/// Drop the component at `object`
pub fn remove_nt_component(batch: &mut WriteBatch<'_>, nt: NaturalTransformationId, object: ObjectId) -> CategoryResult<()> {
    require(&batch.snapshot(), nt)?;
    remove_owned_edge(
        batch,
        RelationKind::Component,
        nt.node(),
        object.node(),
        EntityKind::Component,
    )
}

/// Attach `datatype` to `object` under `field_name`
///
/// A field already bound to another datatype is rebound. A datatype can be
/// attached to an object under one field only.
pub fn set_property(
    batch: &mut WriteBatch<'_>,
    object: ObjectId,
    field_name: &str,
    datatype: DatatypeId,
) -> CategoryResult<()> {
    let field = require_name(EntityKind::Property, field_name)?;
    let replaced = {
        let snapshot = batch.snapshot();
        let owner = require(&snapshot, object)?;
        require(&snapshot, datatype)?;
        let properties = snapshot.properties(object);
        if let Some(other) = properties
            .iter()
            .find(|p| p.datatype_id == datatype && p.field_name != field)
        {
            return Err(CategoryError::invalid_reference(format!(
                "datatype is already attached to '{}' as '{}'",
                owner.name, other.field_name
            )));
        }
        properties
            .into_iter()
            .find(|p| p.field_name == field && p.datatype_id != datatype)
    };

    batch.put_edge(
        EdgeKey::new(RelationKind::Property, object, datatype),
        Edge::to(datatype).with_label(field.clone()),
    );
    if let Some(previous) = replaced {
        batch.remove_edge(EdgeKey::new(RelationKind::Property, object, previous.datatype_id));
    }
    debug!(object_id = %object, field = %field, datatype_id = %datatype, "Set property");
    Ok(())
}

/// Remove the property called `field_name`
pub fn remove_property(batch: &mut WriteBatch<'_>, object: ObjectId, field_name: &str) -> CategoryResult<()> {
    let datatype = {
        let snapshot = batch.snapshot();
        require(&snapshot, object)?;
        snapshot
            .properties(object)
            .into_iter()
            .find(|p| p.field_name == field_name)
            .map(|p| p.datatype_id)
            .ok_or_else(|| CategoryError::not_found(EntityKind::Property, object))?
    };
    batch.remove_edge(EdgeKey::new(RelationKind::Property, object, datatype));
    Ok(())
}

/// Object-map of a functor with resolved names
pub fn functor_object_mappings(snapshot: &Snapshot<'_>, functor: FunctorId) -> CategoryResult<Vec<MappingEntry>> {
    require(snapshot, functor)?;
    Ok(resolve(snapshot, RelationKind::ObjectMapping, functor.node()))
}

/// Morphism-map of a functor with resolved names
pub fn functor_morphism_mappings(snapshot: &Snapshot<'_>, functor: FunctorId) -> CategoryResult<Vec<MappingEntry>> {
    require(snapshot, functor)?;
    Ok(resolve(snapshot, RelationKind::MorphismMapping, functor.node()))
}

/// Components of a natural transformation with resolved names
pub fn nt_components(snapshot: &Snapshot<'_>, nt: NaturalTransformationId) -> CategoryResult<Vec<MappingEntry>> {
    require(snapshot, nt)?;
    Ok(resolve(snapshot, RelationKind::Component, nt.node()))
}

/// Properties of an object with resolved literals
pub fn properties_of(snapshot: &Snapshot<'_>, object: ObjectId) -> CategoryResult<Vec<PropertyEntry>> {
    require(snapshot, object)?;
    Ok(snapshot
        .properties(object)
        .into_iter()
        .map(|p| PropertyEntry {
            literal: snapshot
                .get(p.datatype_id)
                .map(|d| d.literal.clone())
                .unwrap_or_default(),
            field_name: p.field_name,
            datatype_id: p.datatype_id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::*;
    use crate::store::GraphStore;
    use crate::transaction::TransactionManager;

    struct Fixture {
        tx: TransactionManager,
        c_a: ObjectId,
        c_b: ObjectId,
        c_f: MorphismId,
        d_x: ObjectId,
        d_y: ObjectId,
        d_g: MorphismId,
        functor: FunctorId,
    }

    fn fixture() -> Fixture {
        let mut tx = TransactionManager::new(GraphStore::in_memory());
        let objects = ObjectRepository::default();
        let (c, _) = tx.execute(|b| CategoryRepository.create(b, NewCategory::named("C"))).unwrap();
        let (d, _) = tx.execute(|b| CategoryRepository.create(b, NewCategory::named("D"))).unwrap();
        let (c_a, _) = tx.execute(|b| objects.create(b, NewObject::new(c, "A"))).unwrap();
        let (c_b, _) = tx.execute(|b| objects.create(b, NewObject::new(c, "B"))).unwrap();
        let (d_x, _) = tx.execute(|b| objects.create(b, NewObject::new(d, "X"))).unwrap();
        let (d_y, _) = tx.execute(|b| objects.create(b, NewObject::new(d, "Y"))).unwrap();
        let (c_f, _) = tx
            .execute(|b| MorphismRepository.create(b, NewMorphism::new(c, "f", c_a, c_b)))
            .unwrap();
        let (d_g, _) = tx
            .execute(|b| MorphismRepository.create(b, NewMorphism::new(d, "g", d_x, d_y)))
            .unwrap();
        let (functor, _) = tx.execute(|b| FunctorRepository.create(b, NewFunctor::new("F", c, d))).unwrap();
        Fixture { tx, c_a, c_b, c_f, d_x, d_y, d_g, functor }
    }

    #[test]
    fn test_object_mapping_respects_categories() {
        let Fixture { mut tx, c_a, d_x, d_y, functor, .. } = fixture();
        tx.execute(|b| add_functor_object_mapping(b, functor, c_a, d_x)).unwrap();

        let err = tx
            .execute(|b| add_functor_object_mapping(b, functor, d_y, d_x))
            .unwrap_err();
        assert!(err.is_invalid_reference());

        let listed = functor_object_mappings(&tx.snapshot(), functor).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!((listed[0].source_name.as_str(), listed[0].target_name.as_str()), ("A", "X"));
    }

    #[test]
    fn test_readding_replaces_target() {
        let Fixture { mut tx, c_a, d_x, d_y, functor, .. } = fixture();
        tx.execute(|b| add_functor_object_mapping(b, functor, c_a, d_x)).unwrap();
        tx.execute(|b| add_functor_object_mapping(b, functor, c_a, d_y)).unwrap();
        let map = tx.snapshot().object_map(functor);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&c_a), Some(&d_y));
    }

    #[test]
    fn test_morphism_mapping_and_removal() {
        let Fixture { mut tx, c_f, d_g, functor, .. } = fixture();
        tx.execute(|b| add_functor_morphism_mapping(b, functor, c_f, d_g)).unwrap();
        assert!(tx
            .execute(|b| add_functor_morphism_mapping(b, functor, d_g, c_f))
            .unwrap_err()
            .is_invalid_reference());

        tx.execute(|b| remove_functor_morphism_mapping(b, functor, c_f)).unwrap();
        assert!(tx
            .execute(|b| remove_functor_morphism_mapping(b, functor, c_f))
            .unwrap_err()
            .is_not_found());
        assert!(functor_morphism_mappings(&tx.snapshot(), functor).unwrap().is_empty());
    }

    #[test]
    fn test_component_must_type_check() {
        let Fixture { mut tx, c_a, c_b, d_x, d_y, d_g, functor, .. } = fixture();
        let (c, d) = {
            let snapshot = tx.snapshot();
            let f = snapshot.get(functor).unwrap();
            (f.source_category_id, f.target_category_id)
        };
        let (other, _) = tx
            .execute(|b| FunctorRepository.create(b, NewFunctor::new("G", c, d)))
            .unwrap();
        let (nt, _) = tx
            .execute(|b| NaturalTransformationRepository.create(b, NewNaturalTransformation::new("α", functor, other)))
            .unwrap();

        tx.execute(|b| add_nt_component(b, nt, c_a, d_g)).unwrap();
        tx.execute(|b| remove_nt_component(b, nt, c_a)).unwrap();

        tx.execute(|b| add_functor_object_mapping(b, functor, c_a, d_x)).unwrap();
        tx.execute(|b| add_functor_object_mapping(b, other, c_a, d_y)).unwrap();
        tx.execute(|b| add_nt_component(b, nt, c_a, d_g)).unwrap();

        tx.execute(|b| add_functor_object_mapping(b, functor, c_b, d_y)).unwrap();
        tx.execute(|b| add_functor_object_mapping(b, other, c_b, d_y)).unwrap();
        let err = tx.execute(|b| add_nt_component(b, nt, c_b, d_g)).unwrap_err();
        assert!(err.to_string().contains("source must be F(B)"));

        let components = nt_components(&tx.snapshot(), nt).unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].target_name, "g");
    }

    #[test]
    fn test_deleting_mapped_object_drops_edges() {
        let Fixture { mut tx, c_a, d_x, functor, .. } = fixture();
        tx.execute(|b| add_functor_object_mapping(b, functor, c_a, d_x)).unwrap();
        let objects = ObjectRepository::default();
        tx.execute(|b| objects.delete(b, d_x)).unwrap();
        assert!(tx.snapshot().object_map(functor).is_empty());
    }

    #[test]
    fn test_properties_rebind_and_cascade() {
        let Fixture { mut tx, c_a, .. } = fixture();
        let (u32_type, _) = tx.execute(|b| DatatypeRepository.create(b, NewDatatype::literal("u32"))).unwrap();
        let (str_type, _) = tx.execute(|b| DatatypeRepository.create(b, NewDatatype::literal("str"))).unwrap();

        tx.execute(|b| set_property(b, c_a, "weight", u32_type)).unwrap();
        assert!(tx
            .execute(|b| set_property(b, c_a, "size", u32_type))
            .unwrap_err()
            .is_invalid_reference());

        tx.execute(|b| set_property(b, c_a, "weight", str_type)).unwrap();
        let props = properties_of(&tx.snapshot(), c_a).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].literal, "str");

        tx.execute(|b| ObjectRepository::default().delete(b, c_a)).unwrap();
        let snapshot = tx.snapshot();
        assert!(snapshot.get(str_type).is_none());
        assert!(snapshot.get(u32_type).is_some());
    }

    #[test]
    fn test_remove_missing_property_is_not_found() {
        let Fixture { mut tx, c_a, .. } = fixture();
        let err = tx.execute(|b| remove_property(b, c_a, "nope")).unwrap_err();
        assert!(err.is_not_found());
    }
}

// Copyright 2025 Cowboy AI, LLC.

//! Structural checks: containment, endpoints and typing

use crate::entity::{EntityId, GraphEntity};
use crate::errors::CategoryError;
use crate::identifiers::NodeId;
use crate::model::{
    Category, CategoryId, Functor, FunctorId, Morphism, NaturalTransformationId, Object, ObjectId,
};
use crate::store::Snapshot;

fn lookup_failed<E: GraphEntity>(id: EntityId<E>) -> Vec<String> {
    vec![format!(
        "Validation failed: {}",
        CategoryError::not_found(E::KIND, id)
    )]
}

/// Name of `id` for messages, or `#id` when it does not resolve
fn display_name(snapshot: &Snapshot<'_>, id: NodeId) -> String {
    snapshot
        .node(id)
        .map(|node| node.name().to_string())
        .unwrap_or_else(|| format!("#{id}"))
}

/// Check morphism endpoints and identity morphisms of a category
///
/// Reports endpoints that do not resolve or lie outside the category,
/// objects without exactly one identity morphism, and identity morphisms
/// that are not endomorphisms.
pub fn validate_category_structure(snapshot: &Snapshot<'_>, category_id: CategoryId) -> Vec<String> {
    let Some(category) = snapshot.get(category_id) else {
        return lookup_failed(category_id);
    };
    let mut errors = Vec::new();

    for morphism in snapshot.morphisms_in(category_id) {
        for (role, endpoint) in [("source", morphism.source_id), ("target", morphism.target_id)] {
            match snapshot.get(endpoint) {
                None => errors.push(format!(
                    "Morphism '{}' {role} object #{endpoint} does not exist",
                    morphism.name
                )),
                Some(object) if object.category_id != category_id => errors.push(format!(
                    "Morphism '{}' {role} object '{}' is not in category '{}'",
                    morphism.name, object.name, category.name
                )),
                Some(_) => {}
            }
        }
        if morphism.is_identity && !morphism.is_endomorphism() {
            errors.push(format!(
                "Identity morphism '{}' is not an endomorphism",
                morphism.name
            ));
        }
    }

    for object in snapshot.objects_in(category_id) {
        let identities = snapshot
            .identities_of(object.id)
            .into_iter()
            .filter(|m| m.category_id == category_id)
            .count();
        match identities {
            1 => {}
            0 => errors.push(format!("Object '{}' missing identity morphism", object.name)),
            n => errors.push(format!("Object '{}' has {n} identity morphisms", object.name)),
        }
    }

    errors
}

fn check_member_object(
    snapshot: &Snapshot<'_>,
    id: ObjectId,
    category: &Category,
    context: &str,
    errors: &mut Vec<String>,
) {
    match snapshot.get::<Object>(id) {
        None => errors.push(format!("{context}: object #{id} does not exist")),
        Some(object) if object.category_id != category.id => errors.push(format!(
            "{context}: object '{}' is not in category '{}'",
            object.name, category.name
        )),
        Some(_) => {}
    }
}

fn check_member_morphism(
    snapshot: &Snapshot<'_>,
    id: NodeId,
    category: &Category,
    context: &str,
    errors: &mut Vec<String>,
) {
    match snapshot.get::<Morphism>(EntityId::from_node(id)) {
        None => errors.push(format!("{context}: morphism #{id} does not exist")),
        Some(morphism) if morphism.category_id != category.id => errors.push(format!(
            "{context}: morphism '{}' is not in category '{}'",
            morphism.name, category.name
        )),
        Some(_) => {}
    }
}

fn functor_categories<'s>(
    snapshot: &Snapshot<'s>,
    functor: &Functor,
    errors: &mut Vec<String>,
) -> Option<(&'s Category, &'s Category)> {
    let source = snapshot.get(functor.source_category_id);
    let target = snapshot.get(functor.target_category_id);
    if source.is_none() {
        errors.push(format!(
            "Functor '{}' source category #{} does not exist",
            functor.name, functor.source_category_id
        ));
    }
    if target.is_none() {
        errors.push(format!(
            "Functor '{}' target category #{} does not exist",
            functor.name, functor.target_category_id
        ));
    }
    source.zip(target)
}

/// Check that every map entry of a functor respects its categories
pub fn validate_functor_structure(snapshot: &Snapshot<'_>, functor_id: FunctorId) -> Vec<String> {
    let Some(functor) = snapshot.get(functor_id) else {
        return lookup_failed(functor_id);
    };
    let mut errors = Vec::new();
    let Some((source, target)) = functor_categories(snapshot, functor, &mut errors) else {
        return errors;
    };

    for (from, to) in snapshot.object_map(functor_id) {
        let context = format!(
            "Object mapping {} ↦ {}",
            display_name(snapshot, from.node()),
            display_name(snapshot, to.node())
        );
        check_member_object(snapshot, from, source, &context, &mut errors);
        check_member_object(snapshot, to, target, &context, &mut errors);
    }
    for (from, to) in snapshot.morphism_map(functor_id) {
        let context = format!(
            "Morphism mapping {} ↦ {}",
            display_name(snapshot, from.node()),
            display_name(snapshot, to.node())
        );
        check_member_morphism(snapshot, from.node(), source, &context, &mut errors);
        check_member_morphism(snapshot, to.node(), target, &context, &mut errors);
    }

    errors
}

/// Check the typing of a natural transformation and its components
///
/// Components are checked against F(X) and G(X) only where F and G map X.
pub fn validate_nt_structure(snapshot: &Snapshot<'_>, nt_id: NaturalTransformationId) -> Vec<String> {
    let Some(nt) = snapshot.get(nt_id) else {
        return lookup_failed(nt_id);
    };
    let mut errors = Vec::new();
    let (Some(f), Some(g)) = (snapshot.get(nt.source_functor_id), snapshot.get(nt.target_functor_id)) else {
        errors.push(format!(
            "Natural transformation '{}' refers to a missing functor",
            nt.name
        ));
        return errors;
    };
    if f.source_category_id != g.source_category_id || f.target_category_id != g.target_category_id {
        errors.push(format!(
            "Functors '{}' and '{}' do not share source and target categories",
            f.name, g.name
        ));
        return errors;
    }
    let Some((source, target)) = functor_categories(snapshot, f, &mut errors) else {
        return errors;
    };

    let f_map = snapshot.object_map(f.id);
    let g_map = snapshot.object_map(g.id);
    for (object, component) in snapshot.components(nt_id) {
        let context = format!(
            "Component at {}",
            display_name(snapshot, object.node())
        );
        check_member_object(snapshot, object, source, &context, &mut errors);
        check_member_morphism(snapshot, component.node(), target, &context, &mut errors);

        let Some(morphism) = snapshot.get(component) else {
            continue;
        };
        if let Some(fx) = f_map.get(&object) {
            if morphism.source_id != *fx {
                errors.push(format!(
                    "{context}: '{}' starts at '{}' but {}(X) is '{}'",
                    morphism.name,
                    display_name(snapshot, morphism.source_id.node()),
                    f.name,
                    display_name(snapshot, fx.node())
                ));
            }
        }
        if let Some(gx) = g_map.get(&object) {
            if morphism.target_id != *gx {
                errors.push(format!(
                    "{context}: '{}' ends at '{}' but {}(X) is '{}'",
                    morphism.name,
                    display_name(snapshot, morphism.target_id.node()),
                    g.name,
                    display_name(snapshot, gx.node())
                ));
            }
        }
    }

    errors
}

//! Cascading deletes, mappings, components and properties

use codices::{
    CategoryWorkspace, EntityPatch, MorphismPatch, NaturalitySquare, Outcome, ViewMode, ViewScope,
};
use pretty_assertions::assert_eq;

fn morphism_names(workspace: &CategoryWorkspace, category: codices::CategoryId) -> Vec<String> {
    workspace
        .list_morphisms(category)
        .into_iter()
        .filter(|m| !m.is_identity)
        .map(|m| m.name)
        .collect()
}

#[test]
fn deleting_an_object_removes_morphisms_touching_it() {
    let mut workspace = CategoryWorkspace::in_memory();
    let cat = workspace.create_category("Cascade", "").unwrap();
    let a = workspace.create_object("A", cat, "").unwrap();
    let b = workspace.create_object("B", cat, "").unwrap();
    let c = workspace.create_object("C", cat, "").unwrap();
    workspace.create_morphism("f", a, b, cat, "").unwrap();
    workspace.create_morphism("g", c, a, cat, "").unwrap();
    let h = workspace.create_morphism("h", b, c, cat, "").unwrap();

    workspace.delete_object(a).unwrap();

    assert_eq!(morphism_names(&workspace, cat), vec!["h"]);
    let h = workspace.get_morphism(h).unwrap();
    assert_eq!((h.source_id, h.target_id), (b, c));
    assert!(workspace.validate_category_structure(cat).is_empty());
}

#[test]
fn morphisms_stay_in_their_own_category() {
    let mut workspace = CategoryWorkspace::in_memory();
    let first = workspace.create_category("Category1", "").unwrap();
    let second = workspace.create_category("Category2", "").unwrap();
    let a1 = workspace.create_object("A", first, "").unwrap();
    let b1 = workspace.create_object("B", first, "").unwrap();
    let a2 = workspace.create_object("A", second, "").unwrap();
    let b2 = workspace.create_object("B", second, "").unwrap();
    workspace.create_morphism("g", a1, b1, first, "g in category 1").unwrap();
    workspace.create_morphism("keep_me", a2, b2, second, "g in category 2").unwrap();

    let err = workspace.create_morphism("cross", a1, b2, first, "").unwrap_err();
    assert!(err.is_invalid_reference());

    workspace.delete_object(a1).unwrap();
    assert!(morphism_names(&workspace, first).is_empty());
    assert_eq!(morphism_names(&workspace, second), vec!["keep_me"]);
}

#[test]
fn deleting_a_category_takes_functors_typed_on_it() {
    let mut workspace = CategoryWorkspace::in_memory();
    let source = workspace.create_category("Source", "").unwrap();
    let target = workspace.create_category("Target", "").unwrap();
    let x = workspace.create_object("X", source, "").unwrap();
    let y = workspace.create_object("Y", target, "").unwrap();
    let f = workspace.create_functor("F", source, target, "").unwrap();
    let g = workspace.create_functor("G", source, target, "").unwrap();
    workspace.add_functor_object_mapping(f, x, y).unwrap();
    let nt = workspace.create_natural_transformation("alpha", f, g, "").unwrap();

    workspace.delete_category(source).unwrap();

    assert!(workspace.get_functor(f).unwrap_err().is_not_found());
    assert!(workspace.get_natural_transformation(nt).unwrap_err().is_not_found());
    assert!(workspace.get_category(target).is_ok());
    assert_eq!(workspace.list_objects(target).len(), 1);
    assert!(workspace.snapshot().edges().is_empty());
}

#[test]
fn deleting_a_functor_keeps_the_mapped_entities() {
    let mut workspace = CategoryWorkspace::in_memory();
    let c = workspace.create_category("C", "").unwrap();
    let d = workspace.create_category("D", "").unwrap();
    let x = workspace.create_object("X", c, "").unwrap();
    let fx = workspace.create_object("FX", d, "").unwrap();
    let f = workspace.create_functor("F", c, d, "").unwrap();
    workspace.add_functor_object_mapping(f, x, fx).unwrap();

    workspace.delete_functor(f).unwrap();

    assert!(workspace.get_object(x).is_ok());
    assert!(workspace.get_object(fx).is_ok());
    assert!(workspace.snapshot().edges().is_empty());
}

#[test]
fn deleting_a_mapped_object_drops_its_mapping_edges() {
    let mut workspace = CategoryWorkspace::in_memory();
    let c = workspace.create_category("C", "").unwrap();
    let d = workspace.create_category("D", "").unwrap();
    let x = workspace.create_object("X", c, "").unwrap();
    let fx = workspace.create_object("FX", d, "").unwrap();
    let f = workspace.create_functor("F", c, d, "").unwrap();
    workspace.add_functor_object_mapping(f, x, fx).unwrap();

    workspace.delete_object(fx).unwrap();
    assert!(workspace.functor_object_mappings(f).unwrap().is_empty());
    assert!(workspace.validate_functor_structure(f).is_empty());
}

#[test]
fn identity_morphisms_are_system_managed() {
    let mut workspace = CategoryWorkspace::in_memory();
    let set = workspace.create_category("Set", "").unwrap();
    let a = workspace.create_object("A", set, "").unwrap();
    let identity = workspace.list_morphisms(set)[0].id;

    assert!(workspace
        .update_morphism(identity, MorphismPatch::default())
        .is_err());
    assert!(workspace.delete_morphism(identity).is_err());

    workspace.update_object(a, EntityPatch::rename("Alpha")).unwrap();
    assert_eq!(workspace.get_morphism(identity).unwrap().name, "id_Alpha");
}

#[test]
fn renames_recheck_uniqueness() {
    let mut workspace = CategoryWorkspace::in_memory();
    let first = workspace.create_category("FirstCategory", "").unwrap();
    workspace.create_category("SecondCategory", "").unwrap();

    let err = workspace
        .update_category(first, EntityPatch::rename("SecondCategory"))
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(workspace.get_category(first).unwrap().name, "FirstCategory");

    let updated = workspace
        .update_category(first, EntityPatch::describe("Updated"))
        .unwrap();
    assert_eq!(updated.description, "Updated");
}

#[test]
fn names_are_case_sensitive() {
    let mut workspace = CategoryWorkspace::in_memory();
    for name in ["MyCategory", "MYCATEGORY", "myCategory"] {
        workspace.create_category(name, "").unwrap();
    }
    assert_eq!(workspace.list_categories().len(), 3);
    assert!(workspace.create_category("  MyCategory ", "").unwrap_err().is_conflict());
}

#[test]
fn natural_transformations_require_parallel_functors() {
    let mut workspace = CategoryWorkspace::in_memory();
    let c = workspace.create_category("C", "").unwrap();
    let d = workspace.create_category("D", "").unwrap();
    let e = workspace.create_category("E", "").unwrap();
    let f = workspace.create_functor("F", c, d, "").unwrap();
    let g = workspace.create_functor("G", c, e, "").unwrap();

    let err = workspace.create_natural_transformation("bad", f, g, "").unwrap_err();
    assert!(err.is_invalid_reference());
    assert!(workspace.list_natural_transformations().is_empty());
}

#[test]
fn naturality_squares_are_checked_by_shape() {
    let mut workspace = CategoryWorkspace::in_memory();
    let c = workspace.create_category("C", "").unwrap();
    let d = workspace.create_category("D", "").unwrap();
    let x = workspace.create_object("X", c, "").unwrap();
    let y = workspace.create_object("Y", c, "").unwrap();
    let f = workspace.create_morphism("f", x, y, c, "").unwrap();
    let fx = workspace.create_object("FX", d, "").unwrap();
    let fy = workspace.create_object("FY", d, "").unwrap();
    let gx = workspace.create_object("GX", d, "").unwrap();
    let gy = workspace.create_object("GY", d, "").unwrap();
    let ff = workspace.create_morphism("Ff", fx, fy, d, "").unwrap();
    let gf = workspace.create_morphism("Gf", gx, gy, d, "").unwrap();
    let ax = workspace.create_morphism("aX", fx, gx, d, "").unwrap();
    let ay = workspace.create_morphism("aY", fy, gy, d, "").unwrap();

    let functor_f = workspace.create_functor("F", c, d, "").unwrap();
    let functor_g = workspace.create_functor("G", c, d, "").unwrap();
    for (functor, images) in [(functor_f, [fx, fy]), (functor_g, [gx, gy])] {
        workspace.add_functor_object_mapping(functor, x, images[0]).unwrap();
        workspace.add_functor_object_mapping(functor, y, images[1]).unwrap();
    }
    workspace.add_functor_morphism_mapping(functor_f, f, ff).unwrap();
    workspace.add_functor_morphism_mapping(functor_g, f, gf).unwrap();

    let alpha = workspace.create_natural_transformation("alpha", functor_f, functor_g, "").unwrap();
    let err = workspace.add_nt_component(alpha, x, ay).unwrap_err();
    assert!(err.is_invalid_reference());
    workspace.add_nt_component(alpha, x, ax).unwrap();

    let missing = workspace.validate_naturality(alpha);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].outcome, Outcome::MissingData);

    workspace.add_nt_component(alpha, y, ay).unwrap();
    let checks = workspace.validate_naturality(alpha);
    assert_eq!(checks.len(), 1);
    assert_eq!(checks[0].outcome, Outcome::WellTyped);
    assert!(workspace.validate_nt_structure(alpha).is_empty());

    let components: Vec<(String, String)> = workspace
        .nt_components(alpha)
        .unwrap()
        .into_iter()
        .map(|entry| (entry.source_name, entry.target_name))
        .collect();
    assert_eq!(
        components,
        vec![
            ("X".to_string(), "aX".to_string()),
            ("Y".to_string(), "aY".to_string())
        ]
    );

    let view = workspace.get_naturality_view(
        ViewScope::NaturalTransformation(alpha),
        NaturalitySquare::new(alpha, f),
    );
    let labels = view.edge_labels();
    assert!(labels.contains(&"F(f)") && labels.contains(&"G(f)"));
}

#[test]
fn functor_views_follow_mapping_changes() {
    let mut workspace = CategoryWorkspace::in_memory();
    let c = workspace.create_category("Cviz", "").unwrap();
    let d = workspace.create_category("Dviz", "").unwrap();
    let x = workspace.create_object("X", c, "").unwrap();
    let fx = workspace.create_object("FX", d, "").unwrap();
    let f = workspace.create_functor("Fviz", c, d, "").unwrap();

    let before = workspace.get_visualization_data(ViewScope::Functors, ViewMode::FunctorDetail);
    assert!(before.edges.iter().all(|e| !e.title.starts_with("Fviz:")));

    workspace.add_functor_object_mapping(f, x, fx).unwrap();
    let after = workspace.get_visualization_data(ViewScope::Functors, ViewMode::FunctorDetail);
    assert!(after.edges.iter().any(|e| e.title == "Fviz: X ↦ FX"));

    let standard = workspace.get_visualization_data(ViewScope::Functors, ViewMode::Standard);
    assert!(standard.edges[0].title.contains("Objects mapped: 1"));
}

#[test]
fn properties_cascade_with_their_object() {
    let mut workspace = CategoryWorkspace::in_memory();
    let set = workspace.create_category("Set", "").unwrap();
    let a = workspace.create_object("A", set, "").unwrap();
    let b = workspace.create_object("B", set, "").unwrap();
    let int = workspace.create_datatype("int", "").unwrap();
    let text = workspace.create_datatype("text", "").unwrap();
    workspace.set_property(a, "size", int).unwrap();
    workspace.set_property(b, "label", text).unwrap();

    let properties = workspace.properties_of(a).unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!((properties[0].field_name.as_str(), properties[0].literal.as_str()), ("size", "int"));
    assert!(workspace.remove_property(a, "missing").unwrap_err().is_not_found());

    workspace.delete_object(a).unwrap();
    let literals: Vec<String> = workspace.list_datatypes().into_iter().map(|d| d.literal).collect();
    assert_eq!(literals, vec!["text"]);
    assert_eq!(workspace.properties_of(b).unwrap().len(), 1);
}

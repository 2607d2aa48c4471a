//! End-to-end properties of the editing workspace

use codices::{
    CategoryError, CategoryWorkspace, EntityKind, Operation, TransactionState, ViewMode, ViewScope,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;

fn category_names(workspace: &CategoryWorkspace) -> Vec<String> {
    workspace.list_categories().into_iter().map(|c| c.name).collect()
}

#[test]
fn valid_by_construction_categories_report_nothing() {
    let mut workspace = CategoryWorkspace::in_memory();
    let set = workspace.create_category("Set", "sets").unwrap();
    let a = workspace.create_object("A", set, "").unwrap();
    let b = workspace.create_object("B", set, "").unwrap();
    let c = workspace.create_object("C", set, "").unwrap();
    workspace.create_morphism("f", a, b, set, "").unwrap();
    workspace.create_morphism("g", b, c, set, "").unwrap();
    workspace.create_morphism("loop", c, c, set, "").unwrap();

    assert!(workspace.validate_category_structure(set).is_empty());
}

#[test]
fn deleting_a_category_leaves_same_named_entities_elsewhere() {
    let mut workspace = CategoryWorkspace::in_memory();
    let first = workspace.create_category("First", "").unwrap();
    let second = workspace.create_category("Second", "").unwrap();
    for category in [first, second] {
        let a = workspace.create_object("A", category, "").unwrap();
        let b = workspace.create_object("B", category, "").unwrap();
        workspace.create_morphism("g", a, b, category, "").unwrap();
    }

    workspace.delete_category(first).unwrap();

    assert!(workspace.get_category(first).unwrap_err().is_not_found());
    assert!(workspace.list_objects(first).is_empty());
    assert!(workspace.list_morphisms(first).is_empty());
    let names: Vec<String> = workspace.list_objects(second).into_iter().map(|o| o.name).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(workspace.list_morphisms(second).len(), 3);
    assert_eq!(workspace.statistics().objects, 2);
}

#[test]
fn objects_come_and_go_with_exactly_one_identity() {
    let mut workspace = CategoryWorkspace::in_memory();
    let set = workspace.create_category("Set", "").unwrap();
    let a = workspace.create_object("A", set, "").unwrap();

    let identities: Vec<_> = workspace
        .list_morphisms(set)
        .into_iter()
        .filter(|m| m.is_identity)
        .collect();
    assert_eq!(identities.len(), 1);
    assert_eq!(identities[0].name, "id_A");
    assert_eq!((identities[0].source_id, identities[0].target_id), (a, a));

    workspace.delete_object(a).unwrap();
    assert!(workspace.list_morphisms(set).is_empty());
}

#[test]
fn rolled_back_category_is_never_committed() {
    let mut workspace = CategoryWorkspace::in_memory();
    workspace.begin().unwrap();
    workspace.create_category("X", "").unwrap();
    assert_eq!(category_names(&workspace), vec!["X"]);
    assert!(workspace.committed().category_by_name("X").is_none());

    assert_eq!(workspace.rollback().unwrap(), 1);
    assert!(category_names(&workspace).is_empty());
    assert_eq!(workspace.transaction_state(), TransactionState::Idle);
}

#[test]
fn committed_category_exists_exactly_once() {
    let mut workspace = CategoryWorkspace::in_memory();
    workspace.begin().unwrap();
    workspace.create_category("X", "").unwrap();
    workspace.commit().unwrap();

    assert_eq!(category_names(&workspace), vec!["X"]);
    assert!(workspace.committed().category_by_name("X").is_some());
    assert!(workspace.pending_changes().is_empty());
}

#[test]
fn duplicate_names_conflict_only_within_their_scope() {
    let mut workspace = CategoryWorkspace::in_memory();
    let sets = workspace.create_category("Sets", "").unwrap();
    let err = workspace.create_category("Sets", "again").unwrap_err();
    assert!(err.is_conflict());
    assert!(matches!(err, CategoryError::NameConflict { .. }));

    let groups = workspace.create_category("Groups", "").unwrap();
    let first = workspace.create_object("A", sets, "").unwrap();
    let second = workspace.create_object("A", groups, "").unwrap();
    assert_ne!(first, second);
    assert!(workspace.create_object("A", sets, "").unwrap_err().is_conflict());
}

#[test]
fn object_mapping_outside_the_source_category_is_rejected() {
    let mut workspace = CategoryWorkspace::in_memory();
    let c = workspace.create_category("C", "").unwrap();
    let d = workspace.create_category("D", "").unwrap();
    let x = workspace.create_object("X", c, "").unwrap();
    let y = workspace.create_object("Y", d, "").unwrap();
    let functor = workspace.create_functor("F", c, d, "").unwrap();

    let err = workspace.add_functor_object_mapping(functor, y, y).unwrap_err();
    assert!(err.is_invalid_reference());
    let err = workspace.add_functor_object_mapping(functor, x, x).unwrap_err();
    assert!(err.is_invalid_reference());
    assert!(workspace.functor_object_mappings(functor).unwrap().is_empty());

    workspace.add_functor_object_mapping(functor, x, y).unwrap();
    assert_eq!(workspace.functor_object_mappings(functor).unwrap().len(), 1);
}

#[test]
fn consecutive_views_are_identical() {
    let mut workspace = CategoryWorkspace::in_memory();
    let set = workspace.create_category("Set", "").unwrap();
    let a = workspace.create_object("A", set, "").unwrap();
    let b = workspace.create_object("B", set, "").unwrap();
    workspace.create_morphism("f", a, b, set, "").unwrap();

    let scope = ViewScope::Category(set);
    let first = workspace.get_visualization_data(scope, ViewMode::Standard);
    let second = workspace.get_visualization_data(scope, ViewMode::Standard);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn standard_category_view_flattens_morphisms_into_edges() {
    let mut workspace = CategoryWorkspace::in_memory();
    let set = workspace.create_category("Set", "").unwrap();
    let a = workspace.create_object("A", set, "").unwrap();
    let b = workspace.create_object("B", set, "").unwrap();
    workspace.create_morphism("f", a, b, set, "").unwrap();

    let view = workspace.get_visualization_data(ViewScope::Category(set), ViewMode::Standard);
    assert_eq!(view.node_labels(), vec!["A", "B"]);
    assert_eq!(view.edge_labels(), vec!["f", "id_A", "id_B"]);

    let ends: Vec<(&str, &str)> = view.edges.iter().map(|e| (e.from.as_str(), e.to.as_str())).collect();
    let (a_id, b_id) = (format!("obj_{a}"), format!("obj_{b}"));
    assert_eq!(
        ends,
        vec![
            (a_id.as_str(), b_id.as_str()),
            (a_id.as_str(), a_id.as_str()),
            (b_id.as_str(), b_id.as_str()),
        ]
    );
    assert!(view.nodes.iter().all(|n| n.group == EntityKind::Object.name()));
}

#[test_case(ViewMode::Standard, 3, 3 ; "standard")]
#[test_case(ViewMode::Meta, 7, 12 ; "meta")]
fn category_view_sizes(mode: ViewMode, nodes: usize, edges: usize) {
    let mut workspace = CategoryWorkspace::in_memory();
    let set = workspace.create_category("FinSet", "").unwrap();
    for name in ["1", "2", "3"] {
        workspace.create_object(name, set, "").unwrap();
    }

    // meta draws the category and the identities as nodes too
    let view = workspace.get_visualization_data(ViewScope::Category(set), mode);
    assert_eq!(view.nodes.len(), nodes);
    assert_eq!(view.edges.len(), edges);
}

#[test]
fn begin_twice_and_commit_while_idle_fail() {
    let mut workspace = CategoryWorkspace::in_memory();
    assert!(matches!(
        workspace.commit().unwrap_err(),
        CategoryError::TransactionState { .. }
    ));
    assert!(workspace.rollback().is_err());

    workspace.begin().unwrap();
    assert!(matches!(
        workspace.begin().unwrap_err(),
        CategoryError::TransactionState { .. }
    ));
    assert_eq!(workspace.transaction_state(), TransactionState::Active);
}

#[test]
fn pending_changes_preview_and_undo() {
    let mut workspace = CategoryWorkspace::in_memory();
    workspace.begin().unwrap();
    let set = workspace.create_category("Set", "").unwrap();
    let a = workspace.create_object("A", set, "").unwrap();
    let identity = workspace.list_morphisms(set)[0].id;

    let preview: Vec<String> = workspace.pending_changes().iter().map(ToString::to_string).collect();
    assert_eq!(
        preview,
        vec![
            format!("1. Create Category 'Set' (#{set})"),
            format!("2. Create Object 'A' (#{a})\n   - Create Morphism 'id_A' (#{identity})"),
        ]
    );
    assert!(workspace
        .pending_changes()
        .iter()
        .flat_map(|staged| staged.changes())
        .all(|entry| entry.operation == Operation::Create));

    let undone = workspace.undo_last().unwrap().unwrap();
    assert_eq!(undone.change.entity, EntityKind::Object);
    assert_eq!(undone.cascaded[0].entity, EntityKind::Morphism);
    assert!(workspace.list_objects(set).is_empty());
    assert!(workspace.list_morphisms(set).is_empty());
    assert_eq!(workspace.pending_changes().len(), 1);

    workspace.commit().unwrap();
    assert_eq!(workspace.statistics().objects, 0);
    assert_eq!(workspace.statistics().identity_morphisms, 0);
    assert!(workspace.validate_category_structure(set).is_empty());
}

#[test]
fn undoing_a_delete_restores_the_object_with_its_morphisms() {
    let mut workspace = CategoryWorkspace::in_memory();
    let set = workspace.create_category("Set", "").unwrap();
    let a = workspace.create_object("A", set, "").unwrap();
    let b = workspace.create_object("B", set, "").unwrap();
    let f = workspace.create_morphism("f", a, b, set, "").unwrap();

    workspace.begin().unwrap();
    workspace.delete_object(a).unwrap();
    let staged = &workspace.pending_changes()[0];
    assert_eq!(workspace.pending_changes().len(), 1);
    assert_eq!(staged.change.operation, Operation::Delete);
    assert_eq!(staged.change.entity, EntityKind::Object);
    assert_eq!(staged.cascaded.len(), 2);
    assert!(workspace.get_morphism(f).is_err());

    let undone = workspace.undo_last().unwrap().unwrap();
    assert_eq!(undone.row_count(), 3);
    assert!(workspace.pending_changes().is_empty());
    assert_eq!(workspace.get_object(a).unwrap().name, "A");
    assert_eq!(workspace.get_morphism(f).unwrap().source_id, a);
    let identities: Vec<String> = workspace
        .list_morphisms(set)
        .into_iter()
        .filter(|m| m.is_identity)
        .map(|m| m.name)
        .collect();
    assert_eq!(identities, vec!["id_A".to_string(), "id_B".to_string()]);
    assert!(workspace.validate_category_structure(set).is_empty());
}

#[test]
fn failed_create_in_transaction_leaves_no_partial_rows() {
    let mut workspace = CategoryWorkspace::in_memory();
    let set = workspace.create_category("Set", "").unwrap();
    let a = workspace.create_object("A", set, "").unwrap();
    workspace.create_morphism("id_B", a, a, set, "").unwrap();

    workspace.begin().unwrap();
    let err = workspace.create_object("B", set, "").unwrap_err();
    assert!(err.is_conflict());
    assert!(workspace.pending_changes().is_empty());
    assert!(workspace.object_by_name(set, "B").is_none());
}

proptest! {
    #[test]
    fn views_are_deterministic(names in prop::collection::btree_set("[A-Z][a-z]{0,4}", 1..8)) {
        let mut workspace = CategoryWorkspace::in_memory();
        let set = workspace.create_category("Set", "").unwrap();
        let mut objects = Vec::new();
        for name in &names {
            objects.push(workspace.create_object(name, set, "").unwrap());
        }
        for (i, pair) in objects.windows(2).enumerate() {
            workspace.create_morphism(&format!("m{i}"), pair[0], pair[1], set, "").unwrap();
        }

        for mode in ViewMode::ALL {
            let scope = ViewScope::Category(set);
            let cached = workspace.get_visualization_data(scope, mode);
            let fresh = codices::build_view(&workspace.snapshot(), scope, mode, None);
            prop_assert_eq!(cached, fresh);
        }
    }

    #[test]
    fn rolled_back_work_is_invisible(
        base in prop::collection::btree_set("[A-Z][a-z]{0,4}", 1..5),
        staged in prop::collection::btree_set("[A-Z][a-z]{0,4}", 1..5),
        delete_first in any::<bool>(),
    ) {
        let mut workspace = CategoryWorkspace::in_memory();
        let set = workspace.create_category("Set", "").unwrap();
        let mut base_ids = Vec::new();
        for name in &base {
            base_ids.push(workspace.create_object(name, set, "").unwrap());
        }
        let before = workspace.get_visualization_data(ViewScope::Category(set), ViewMode::Meta);
        let statistics = workspace.statistics();

        workspace.begin().unwrap();
        if delete_first {
            workspace.delete_object(base_ids[0]).unwrap();
        }
        for name in &staged {
            // collisions with base names are fine, they just fail
            let _ = workspace.create_object(&format!("{name}2"), set, "");
        }
        workspace.rollback().unwrap();

        prop_assert_eq!(workspace.statistics(), statistics);
        let after = codices::build_view(&workspace.snapshot(), ViewScope::Category(set), ViewMode::Meta, None);
        prop_assert_eq!(before, after);
    }
}

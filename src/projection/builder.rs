// Copyright 2025 Cowboy AI, LLC.

//! Snapshot to view model
//!
//! Building a view only reads the snapshot. Every listing the builder uses
//! is in id order, so repeated builds over unchanged data are identical.

use std::collections::BTreeSet;
use tracing::debug;

use crate::errors::CategoryError;
use crate::identifiers::NodeId;
use crate::model::{Category, CategoryId, Functor, Morphism, NaturalTransformation, ObjectId};
use crate::node_types::EntityKind;
use crate::relationship_types::RelationKind;
use crate::store::{ChangeSet, Snapshot};

use super::view::{
    view_id, EdgeRole, NaturalitySquare, ViewEdge, ViewMode, ViewModel, ViewNode, ViewScope,
};

/// What a built view read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Dependencies {
    /// Entities drawn or consulted
    pub nodes: BTreeSet<NodeId>,
    /// Kinds whose creation adds to the view
    pub kinds: BTreeSet<EntityKind>,
}

impl Dependencies {
    /// Whether `changes` may alter the view
    pub fn is_stale(&self, changes: &ChangeSet) -> bool {
        !self.nodes.is_disjoint(&changes.nodes) || !self.kinds.is_disjoint(&changes.kinds)
    }
}

/// Build the view of `scope` in `mode`
///
/// `square` only matters for `nt-detail` views: when its transformation is
/// in scope, the images of its morphism under both functors are drawn as
/// edges labelled `F(f)` and `G(f)`.
///
/// A scope id that does not resolve yields an empty view whose metadata
/// carries `error`. `complete` mode ignores the scope.
pub fn build_view(
    snapshot: &Snapshot<'_>,
    scope: ViewScope,
    mode: ViewMode,
    square: Option<NaturalitySquare>,
) -> ViewModel {
    build_tracked(snapshot, scope, mode, square).0
}

/// Like [`build_view`], also returning what the view depends on
///
/// Failed views come back without dependencies and must not be cached.
pub(crate) fn build_tracked(
    snapshot: &Snapshot<'_>,
    scope: ViewScope,
    mode: ViewMode,
    square: Option<NaturalitySquare>,
) -> (ViewModel, Option<Dependencies>) {
    let mut builder = ViewBuilder::new(*snapshot, mode);
    match (scope, mode) {
        (_, ViewMode::Complete) | (ViewScope::Complete, _) => builder.complete(),
        (ViewScope::Category(id), ViewMode::Meta) => builder.category(id, true),
        (ViewScope::Category(id), _) => builder.category(id, false),
        (ViewScope::Functor(_) | ViewScope::Functors, ViewMode::Meta) => {
            builder.functor_graph(scope, true)
        }
        (ViewScope::Functor(_) | ViewScope::Functors, ViewMode::FunctorDetail) => {
            builder.functor_detail(scope)
        }
        (ViewScope::Functor(_) | ViewScope::Functors, _) => builder.functor_graph(scope, false),
        (
            ViewScope::NaturalTransformation(_) | ViewScope::NaturalTransformations,
            ViewMode::Meta,
        ) => builder.nt_graph(scope, true),
        (
            ViewScope::NaturalTransformation(_) | ViewScope::NaturalTransformations,
            ViewMode::NtDetail,
        ) => builder.nt_detail(scope, square),
        (ViewScope::NaturalTransformation(_) | ViewScope::NaturalTransformations, _) => {
            builder.nt_graph(scope, false)
        }
    }
    let (view, deps) = builder.finish();
    debug!(
        ?scope,
        mode = %mode,
        nodes = view.nodes.len(),
        edges = view.edges.len(),
        "built view"
    );
    (view, deps)
}

/// Non-identity morphisms first, then identities, each in creation order
fn standard_order(mut morphisms: Vec<&Morphism>) -> Vec<&Morphism> {
    morphisms.sort_by_key(|m| (m.is_identity, m.id));
    morphisms
}

fn tooltip(kind: EntityKind, name: &str, description: &str) -> String {
    if description.is_empty() {
        format!("{kind}: {name}")
    } else {
        format!("{kind}: {name}\n{description}")
    }
}

fn name_of(snapshot: &Snapshot<'_>, id: impl Into<NodeId>) -> String {
    let id = id.into();
    snapshot
        .node(id)
        .map(|node| node.name().to_string())
        .unwrap_or_else(|| format!("#{id}"))
}

struct ViewBuilder<'s> {
    snapshot: Snapshot<'s>,
    mode: ViewMode,
    view: ViewModel,
    placed: BTreeSet<String>,
    deps: Dependencies,
    failed: bool,
}

impl<'s> ViewBuilder<'s> {
    fn new(snapshot: Snapshot<'s>, mode: ViewMode) -> Self {
        Self {
            snapshot,
            mode,
            view: ViewModel::default(),
            placed: BTreeSet::new(),
            deps: Dependencies::default(),
            failed: false,
        }
    }

    fn finish(mut self) -> (ViewModel, Option<Dependencies>) {
        if self.failed {
            return (self.view, None);
        }
        self.view.set("mode", self.mode.as_str());
        (self.view, Some(self.deps))
    }

    fn fail(&mut self, error: CategoryError) {
        debug!(error = %error, "view scope did not resolve");
        self.view = ViewModel::failed(self.mode, error);
        self.failed = true;
    }

    fn depend(&mut self, id: impl Into<NodeId>) {
        self.deps.nodes.insert(id.into());
    }

    fn depend_on_kinds(&mut self, kinds: &[EntityKind]) {
        self.deps.kinds.extend(kinds.iter().copied());
    }

    fn place(&mut self, kind: EntityKind, id: impl Into<NodeId>, label: &str, title: String) {
        let id = id.into();
        self.depend(id);
        let node = ViewNode::new(kind, id, label, title);
        if self.placed.insert(node.id.clone()) {
            self.view.nodes.push(node);
        }
    }

    /// Edge between two placed nodes; dropped when either end is missing
    fn connect(&mut self, edge: ViewEdge) {
        if self.placed.contains(&edge.from) && self.placed.contains(&edge.to) {
            self.view.edges.push(edge);
        }
    }

    fn link(&mut self, from: (EntityKind, NodeId), to: (EntityKind, NodeId), relation: RelationKind) {
        debug_assert!(relation.is_structural(), "{relation} is not a structural relation");
        let edge = ViewEdge::new(
            EdgeRole::Structural,
            view_id(from.0, from.1),
            view_id(to.0, to.1),
            relation.label().to_string(),
        );
        self.connect(edge.labelled(relation.label()));
    }

    fn draw_between(&mut self, role: EdgeRole, from: ObjectId, to: ObjectId, title: String, label: &str) {
        let edge = ViewEdge::new(
            role,
            view_id(EntityKind::Object, from),
            view_id(EntityKind::Object, to),
            title,
        );
        self.connect(edge.labelled(label));
    }

    fn draw_morphism(&mut self, morphism: &Morphism) {
        self.depend(morphism.id);
        let role = if morphism.is_identity {
            EdgeRole::Identity
        } else {
            EdgeRole::Morphism
        };
        let title = tooltip(EntityKind::Morphism, &morphism.name, &morphism.description);
        self.draw_between(role, morphism.source_id, morphism.target_id, title, &morphism.name);
    }

    fn place_category(&mut self, category: &Category) {
        let title = tooltip(EntityKind::Category, &category.name, &category.description);
        self.place(EntityKind::Category, category.id, &category.name, title);
    }

    /// Objects as nodes and morphisms as edges; returns the object and morphism counts
    fn draw_category_contents(&mut self, category: CategoryId) -> (usize, usize) {
        let snapshot = self.snapshot;
        self.depend(category);
        let objects = snapshot.objects_in(category);
        for object in &objects {
            let title = tooltip(EntityKind::Object, &object.name, &object.description);
            self.place(EntityKind::Object, object.id, &object.name, title);
        }
        let morphisms = standard_order(snapshot.morphisms_in(category));
        for morphism in &morphisms {
            self.draw_morphism(morphism);
        }
        (objects.len(), morphisms.len())
    }

    fn category(&mut self, id: CategoryId, meta: bool) {
        let snapshot = self.snapshot;
        let Some(category) = snapshot.get(id) else {
            return self.fail(CategoryError::not_found(EntityKind::Category, id));
        };
        let morphisms = standard_order(snapshot.morphisms_in(id));
        let identities = morphisms.iter().filter(|m| m.is_identity).count();

        if !meta {
            let (objects, morphisms) = self.draw_category_contents(id);
            self.view.set("category_name", category.name.as_str());
            self.view.set("object_count", objects);
            self.view.set("morphism_count", morphisms);
            self.view.set("identity_count", identities);
            return;
        }

        let root = (EntityKind::Category, id.node());
        self.place_category(category);
        let objects = snapshot.objects_in(id);
        for object in &objects {
            let title = tooltip(EntityKind::Object, &object.name, &object.description);
            self.place(EntityKind::Object, object.id, &object.name, title);
            self.link(root, (EntityKind::Object, object.id.node()), RelationKind::Includes);
        }
        for morphism in &morphisms {
            let title = format!(
                "{}\nIdentity: {}",
                tooltip(EntityKind::Morphism, &morphism.name, &morphism.description),
                morphism.is_identity
            );
            let node = (EntityKind::Morphism, morphism.id.node());
            self.place(EntityKind::Morphism, morphism.id, &morphism.name, title);
            self.link(root, node, RelationKind::Includes);
            self.link(node, (EntityKind::Object, morphism.source_id.node()), RelationKind::Source);
            self.link(node, (EntityKind::Object, morphism.target_id.node()), RelationKind::Target);
        }

        let mut properties = 0;
        for object in &objects {
            for property in snapshot.properties(object.id) {
                let Some(datatype) = snapshot.get(property.datatype_id) else {
                    continue;
                };
                properties += 1;
                let title = tooltip(EntityKind::Datatype, &datatype.literal, &datatype.description);
                self.place(EntityKind::Datatype, datatype.id, &datatype.literal, title);
                let edge = ViewEdge::new(
                    EdgeRole::Property,
                    view_id(EntityKind::Object, object.id),
                    view_id(EntityKind::Datatype, datatype.id),
                    format!("{}.{}: {}", object.name, property.field_name, datatype.literal),
                );
                self.connect(edge.labelled(property.field_name));
            }
        }

        self.view.set("category_name", category.name.as_str());
        self.view.set("object_count", objects.len());
        self.view.set("morphism_count", morphisms.len());
        self.view.set("identity_count", identities);
        self.view.set("property_count", properties);
    }

    fn functors_in_scope(&mut self, scope: ViewScope) -> Option<Vec<&'s Functor>> {
        let snapshot = self.snapshot;
        if let ViewScope::Functor(id) = scope {
            let Some(functor) = snapshot.get(id) else {
                self.fail(CategoryError::not_found(EntityKind::Functor, id));
                return None;
            };
            return Some(vec![functor]);
        }
        self.depend_on_kinds(&[EntityKind::Category, EntityKind::Functor]);
        Some(snapshot.functors())
    }

    fn single_functor_metadata(&mut self, scope: ViewScope) {
        let snapshot = self.snapshot;
        if let ViewScope::Functor(id) = scope {
            self.view.set("functor_name", name_of(&snapshot, id));
            self.view.set("object_mapping_count", snapshot.object_map(id).len());
            self.view.set("morphism_mapping_count", snapshot.morphism_map(id).len());
        }
    }

    /// Categories as nodes, functors as edges (or typed nodes in meta mode)
    fn functor_graph(&mut self, scope: ViewScope, meta: bool) {
        let snapshot = self.snapshot;
        let Some(functors) = self.functors_in_scope(scope) else {
            return;
        };
        let mut categories: Vec<&Category> = match scope {
            ViewScope::Functor(_) => functors
                .iter()
                .flat_map(|f| [f.source_category_id, f.target_category_id])
                .filter_map(|id| snapshot.get(id))
                .collect(),
            _ => snapshot.categories(),
        };
        categories.dedup_by_key(|c| c.id);
        for category in &categories {
            self.place_category(category);
        }

        for functor in &functors {
            self.depend(functor.id);
            let source = (EntityKind::Category, functor.source_category_id.node());
            let target = (EntityKind::Category, functor.target_category_id.node());
            if meta {
                let node = (EntityKind::Functor, functor.id.node());
                let title = tooltip(EntityKind::Functor, &functor.name, &functor.description);
                self.place(EntityKind::Functor, functor.id, &functor.name, title);
                self.link(node, source, RelationKind::Source);
                self.link(node, target, RelationKind::Target);
            } else {
                let title = format!(
                    "{}\nObjects mapped: {} / Morphisms mapped: {}",
                    tooltip(EntityKind::Functor, &functor.name, &functor.description),
                    snapshot.object_map(functor.id).len(),
                    snapshot.morphism_map(functor.id).len()
                );
                let edge = ViewEdge::new(
                    EdgeRole::Functor,
                    view_id(source.0, source.1),
                    view_id(target.0, target.1),
                    title,
                );
                self.connect(edge.labelled(&functor.name));
            }
        }

        self.view.set("category_count", categories.len());
        self.view.set("functor_count", functors.len());
        self.single_functor_metadata(scope);
    }

    /// Objects of both categories, internal morphisms, object-mapping edges
    fn functor_detail(&mut self, scope: ViewScope) {
        let snapshot = self.snapshot;
        let Some(functors) = self.functors_in_scope(scope) else {
            return;
        };
        let mut categories: Vec<CategoryId> = Vec::new();
        for functor in &functors {
            for id in [functor.source_category_id, functor.target_category_id] {
                if !categories.contains(&id) {
                    categories.push(id);
                }
            }
        }
        for id in &categories {
            if snapshot.get(*id).is_some() {
                self.draw_category_contents(*id);
            }
        }

        let mut object_mappings = 0;
        let mut morphism_mappings = 0;
        for functor in &functors {
            self.depend(functor.id);
            morphism_mappings += snapshot.morphism_map(functor.id).len();
            for (object, image) in snapshot.object_map(functor.id) {
                object_mappings += 1;
                let title = format!(
                    "{}: {} ↦ {}",
                    functor.name,
                    name_of(&snapshot, object),
                    name_of(&snapshot, image)
                );
                self.draw_between(EdgeRole::ObjectMapping, object, image, title, &functor.name);
            }
        }

        self.view.set("category_count", categories.len());
        self.view.set("functor_count", functors.len());
        self.view.set("object_mapping_count", object_mappings);
        self.view.set("morphism_mapping_count", morphism_mappings);
        self.single_functor_metadata(scope);
    }

    fn nts_in_scope(&mut self, scope: ViewScope) -> Option<Vec<&'s NaturalTransformation>> {
        let snapshot = self.snapshot;
        if let ViewScope::NaturalTransformation(id) = scope {
            let Some(nt) = snapshot.get(id) else {
                self.fail(CategoryError::not_found(EntityKind::NaturalTransformation, id));
                return None;
            };
            return Some(vec![nt]);
        }
        self.depend_on_kinds(&[EntityKind::Functor, EntityKind::NaturalTransformation]);
        Some(snapshot.natural_transformations())
    }

    /// Functors as nodes, natural transformations as edges (or typed nodes in meta mode)
    fn nt_graph(&mut self, scope: ViewScope, meta: bool) {
        let snapshot = self.snapshot;
        let Some(nts) = self.nts_in_scope(scope) else {
            return;
        };
        let mut functors: Vec<&Functor> = match scope {
            ViewScope::NaturalTransformation(_) => nts
                .iter()
                .flat_map(|nt| [nt.source_functor_id, nt.target_functor_id])
                .filter_map(|id| snapshot.get(id))
                .collect(),
            _ => snapshot.functors(),
        };
        functors.dedup_by_key(|f| f.id);
        for functor in &functors {
            self.depend(functor.source_category_id);
            self.depend(functor.target_category_id);
            let title = format!(
                "{}\n{} → {}",
                tooltip(EntityKind::Functor, &functor.name, &functor.description),
                name_of(&snapshot, functor.source_category_id),
                name_of(&snapshot, functor.target_category_id)
            );
            self.place(EntityKind::Functor, functor.id, &functor.name, title);
        }

        for nt in &nts {
            self.depend(nt.id);
            let source = (EntityKind::Functor, nt.source_functor_id.node());
            let target = (EntityKind::Functor, nt.target_functor_id.node());
            if meta {
                let node = (EntityKind::NaturalTransformation, nt.id.node());
                let title = tooltip(EntityKind::NaturalTransformation, &nt.name, &nt.description);
                self.place(EntityKind::NaturalTransformation, nt.id, &nt.name, title);
                self.link(node, source, RelationKind::Source);
                self.link(node, target, RelationKind::Target);
            } else {
                let title = format!(
                    "{}\nComponents: {}",
                    tooltip(EntityKind::NaturalTransformation, &nt.name, &nt.description),
                    snapshot.components(nt.id).len()
                );
                let edge = ViewEdge::new(
                    EdgeRole::NaturalTransformation,
                    view_id(source.0, source.1),
                    view_id(target.0, target.1),
                    title,
                );
                self.connect(edge.labelled(&nt.name));
            }
        }

        self.view.set("functor_count", functors.len());
        self.view.set("natural_transformation_count", nts.len());
        if let ViewScope::NaturalTransformation(id) = scope {
            self.view.set("natural_transformation_name", name_of(&snapshot, id));
            self.view.set("component_count", snapshot.components(id).len());
        }
    }

    /// Target-category objects with one edge per component
    fn nt_detail(&mut self, scope: ViewScope, square: Option<NaturalitySquare>) {
        let snapshot = self.snapshot;
        let Some(nts) = self.nts_in_scope(scope) else {
            return;
        };
        let typed: Vec<(&NaturalTransformation, &Functor, &Functor)> = nts
            .iter()
            .filter_map(|nt| {
                let f = snapshot.get(nt.source_functor_id)?;
                let g = snapshot.get(nt.target_functor_id)?;
                Some((*nt, f, g))
            })
            .collect();

        let mut targets: Vec<CategoryId> = Vec::new();
        for (_, f, _) in &typed {
            if targets.contains(&f.target_category_id) {
                continue;
            }
            targets.push(f.target_category_id);
            self.depend(f.target_category_id);
            for object in snapshot.objects_in(f.target_category_id) {
                let title = tooltip(EntityKind::Object, &object.name, &object.description);
                self.place(EntityKind::Object, object.id, &object.name, title);
            }
        }

        let mut components = 0;
        for (nt, f, g) in &typed {
            self.depend(nt.id);
            self.depend(f.id);
            self.depend(g.id);
            self.depend(f.source_category_id);
            for (object, component) in snapshot.components(nt.id) {
                components += 1;
                self.depend(object);
                self.depend(component);
                let Some(morphism) = snapshot.get(component) else {
                    continue;
                };
                let title = format!("α_{}: {}", name_of(&snapshot, object), morphism.name);
                self.draw_between(EdgeRole::Component, morphism.source_id, morphism.target_id, title, &nt.name);
            }
        }
        if let Some(square) = square {
            self.overlay_square(&typed, square);
        }

        self.view.set("natural_transformation_count", nts.len());
        self.view.set("component_count", components);
    }

    fn overlay_square(
        &mut self,
        typed: &[(&NaturalTransformation, &Functor, &Functor)],
        square: NaturalitySquare,
    ) {
        let snapshot = self.snapshot;
        self.depend(square.nt_id);
        self.depend(square.morphism_id);
        let Some((_, f, g)) = typed.iter().copied().find(|(nt, _, _)| nt.id == square.nt_id) else {
            self.view.set(
                "overlay_error",
                format!("Natural transformation #{} is not in this view", square.nt_id),
            );
            return;
        };
        let Some(morphism) = snapshot.get(square.morphism_id) else {
            let error = CategoryError::not_found(EntityKind::Morphism, square.morphism_id);
            self.view.set("overlay_error", error.to_string());
            return;
        };

        let mut missing = Vec::new();
        for (label, functor) in [("F(f)", f), ("G(f)", g)] {
            let image = snapshot
                .morphism_map(functor.id)
                .get(&square.morphism_id)
                .and_then(|id| snapshot.get(*id));
            let Some(image) = image else {
                missing.push(label);
                continue;
            };
            self.depend(image.id);
            let title = format!("{label} = {}({}) = {}", functor.name, morphism.name, image.name);
            self.draw_between(EdgeRole::Naturality, image.source_id, image.target_id, title, label);
        }

        self.view.set("overlay_morphism", morphism.name.as_str());
        if !missing.is_empty() {
            self.view.set("overlay_missing", missing.join(", "));
        }
    }

    /// Every category, functor and natural transformation with typing edges
    fn complete(&mut self) {
        let snapshot = self.snapshot;
        self.depend_on_kinds(&[
            EntityKind::Category,
            EntityKind::Object,
            EntityKind::Morphism,
            EntityKind::Functor,
            EntityKind::NaturalTransformation,
        ]);
        let categories = snapshot.categories();
        let functors = snapshot.functors();
        let nts = snapshot.natural_transformations();

        for category in &categories {
            self.place_category(category);
        }
        for functor in &functors {
            let node = (EntityKind::Functor, functor.id.node());
            let title = tooltip(EntityKind::Functor, &functor.name, &functor.description);
            self.place(EntityKind::Functor, functor.id, &functor.name, title);
            self.link(node, (EntityKind::Category, functor.source_category_id.node()), RelationKind::Source);
            self.link(node, (EntityKind::Category, functor.target_category_id.node()), RelationKind::Target);
        }
        for nt in &nts {
            let node = (EntityKind::NaturalTransformation, nt.id.node());
            let title = tooltip(EntityKind::NaturalTransformation, &nt.name, &nt.description);
            self.place(EntityKind::NaturalTransformation, nt.id, &nt.name, title);
            self.link(node, (EntityKind::Functor, nt.source_functor_id.node()), RelationKind::Source);
            self.link(node, (EntityKind::Functor, nt.target_functor_id.node()), RelationKind::Target);
        }

        let statistics = snapshot.statistics();
        self.view.set("total_entities", self.view.nodes.len());
        self.view.set("categories", categories.len());
        self.view.set("functors", functors.len());
        self.view.set("natural_transformations", nts.len());
        self.view.set("objects", statistics.objects);
        self.view.set("morphisms", statistics.morphisms + statistics.identity_morphisms);
    }
}

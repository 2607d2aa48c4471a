// Copyright 2025 Cowboy AI, LLC.

//! Read-only view of the current graph
//!
//! A snapshot merges the staged overlay (when a transaction is active) over
//! the committed layer, so callers never need to know which layer a row
//! came from. All listings are returned in id order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, GraphEntity};
use crate::identifiers::NodeId;
use crate::model::{
    Category, CategoryId, Datatype, DatatypeId, Functor, FunctorId, Morphism, MorphismId,
    NaturalTransformation, NaturalTransformationId, Node, Object, ObjectId,
};
use crate::relationship_types::{Edge, EdgeKey, RelationKind};

use super::graph::{GraphState, Layered};
use super::overlay::Overlay;

/// A field on an object pointing at a datatype
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEdge {
    /// Object carrying the property
    pub object_id: ObjectId,
    /// Field name, unique per object
    pub field_name: String,
    /// Datatype attached under the field
    pub datatype_id: DatatypeId,
}

/// Entity counts of a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    /// Number of categories
    pub categories: usize,
    /// Number of objects
    pub objects: usize,
    /// Number of user morphisms
    pub morphisms: usize,
    /// Number of identity morphisms
    pub identity_morphisms: usize,
    /// Number of functors
    pub functors: usize,
    /// Number of natural transformations
    pub natural_transformations: usize,
    /// Number of datatypes
    pub datatypes: usize,
}

/// Read-only merged view over the committed layer and the overlay
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    committed: &'a GraphState,
    overlay: Option<&'a Overlay>,
}

impl<'a> Snapshot<'a> {
    /// View `committed`, shadowed by `overlay` if present
    pub fn new(committed: &'a GraphState, overlay: Option<&'a Overlay>) -> Self {
        Self { committed, overlay }
    }

    /// Whether staged rows are visible through this snapshot
    pub fn is_staged(&self) -> bool {
        self.overlay.is_some()
    }

    fn node_table(&self) -> Layered<'a, NodeId, Node> {
        Layered::new(&self.committed.nodes, self.overlay.map(|o| &o.nodes))
    }

    fn edge_table(&self) -> Layered<'a, EdgeKey, Edge> {
        Layered::new(&self.committed.edges, self.overlay.map(|o| &o.edges))
    }

    /// Look up any node
    pub fn node(&self, id: NodeId) -> Option<&'a Node> {
        self.node_table().get(&id)
    }

    /// Every node in id order
    pub fn nodes(&self) -> Vec<&'a Node> {
        self.node_table().all().into_iter().map(|(_, node)| node).collect()
    }

    /// Look up a typed entity
    pub fn get<E: GraphEntity>(&self, id: EntityId<E>) -> Option<&'a E> {
        self.node(id.node()).and_then(E::from_node)
    }

    /// Every entity of one type in id order
    pub fn all<E: GraphEntity>(&self) -> Vec<&'a E> {
        self.node_table()
            .all()
            .into_iter()
            .filter_map(|(_, node)| E::from_node(node))
            .collect()
    }

    /// Look up one stored edge
    pub fn edge(&self, key: &EdgeKey) -> Option<&'a Edge> {
        self.edge_table().get(key)
    }

    /// Stored edges of `kind` owned by `owner`, ordered by source id
    pub fn owned_edges(&self, kind: RelationKind, owner: impl Into<NodeId>) -> Vec<(EdgeKey, &'a Edge)> {
        self.edge_table()
            .range(EdgeKey::owner_range(kind, owner.into()))
    }

    /// Every stored edge in key order
    pub fn edges(&self) -> Vec<(EdgeKey, &'a Edge)> {
        self.edge_table().all()
    }

    /// Keys of stored edges whose owner, source or target is `id`
    pub fn edges_mentioning(&self, id: NodeId) -> Vec<EdgeKey> {
        self.edges()
            .into_iter()
            .filter(|(key, edge)| key.owner == id || key.from == id || edge.to == id)
            .map(|(key, _)| key)
            .collect()
    }

    /// All categories
    pub fn categories(&self) -> Vec<&'a Category> {
        self.all::<Category>()
    }

    /// Category with an exact (case-sensitive) name
    pub fn category_by_name(&self, name: &str) -> Option<&'a Category> {
        self.categories().into_iter().find(|c| c.name == name)
    }

    /// Objects owned by a category
    pub fn objects_in(&self, category: CategoryId) -> Vec<&'a Object> {
        self.all::<Object>()
            .into_iter()
            .filter(|o| o.category_id == category)
            .collect()
    }

    /// Object with an exact name inside a category
    pub fn object_by_name(&self, category: CategoryId, name: &str) -> Option<&'a Object> {
        self.objects_in(category).into_iter().find(|o| o.name == name)
    }

    /// Morphisms owned by a category, identities included
    pub fn morphisms_in(&self, category: CategoryId) -> Vec<&'a Morphism> {
        self.all::<Morphism>()
            .into_iter()
            .filter(|m| m.category_id == category)
            .collect()
    }

    /// Morphism with an exact name inside a category
    pub fn morphism_by_name(&self, category: CategoryId, name: &str) -> Option<&'a Morphism> {
        self.morphisms_in(category).into_iter().find(|m| m.name == name)
    }

    /// Morphisms with `object` as source or target
    pub fn morphisms_touching(&self, object: ObjectId) -> Vec<&'a Morphism> {
        self.all::<Morphism>()
            .into_iter()
            .filter(|m| m.source_id == object || m.target_id == object)
            .collect()
    }

    /// Identity morphisms on `object`
    pub fn identities_of(&self, object: ObjectId) -> Vec<&'a Morphism> {
        self.morphisms_touching(object)
            .into_iter()
            .filter(|m| m.is_identity && m.source_id == object && m.target_id == object)
            .collect()
    }

    /// All functors
    pub fn functors(&self) -> Vec<&'a Functor> {
        self.all::<Functor>()
    }

    /// Functors with `category` as source or target
    pub fn functors_on(&self, category: CategoryId) -> Vec<&'a Functor> {
        self.functors()
            .into_iter()
            .filter(|f| f.source_category_id == category || f.target_category_id == category)
            .collect()
    }

    /// All natural transformations
    pub fn natural_transformations(&self) -> Vec<&'a NaturalTransformation> {
        self.all::<NaturalTransformation>()
    }

    /// Natural transformations with `functor` as source or target
    pub fn natural_transformations_on(&self, functor: FunctorId) -> Vec<&'a NaturalTransformation> {
        self.natural_transformations()
            .into_iter()
            .filter(|nt| nt.source_functor_id == functor || nt.target_functor_id == functor)
            .collect()
    }

    /// All datatypes
    pub fn datatypes(&self) -> Vec<&'a Datatype> {
        self.all::<Datatype>()
    }

    /// Object-map of a functor, ordered by source object id
    pub fn object_map(&self, functor: FunctorId) -> IndexMap<ObjectId, ObjectId> {
        self.owned_edges(RelationKind::ObjectMapping, functor)
            .into_iter()
            .map(|(key, edge)| (ObjectId::from_node(key.from), ObjectId::from_node(edge.to)))
            .collect()
    }

    /// Morphism-map of a functor, ordered by source morphism id
    pub fn morphism_map(&self, functor: FunctorId) -> IndexMap<MorphismId, MorphismId> {
        self.owned_edges(RelationKind::MorphismMapping, functor)
            .into_iter()
            .map(|(key, edge)| (MorphismId::from_node(key.from), MorphismId::from_node(edge.to)))
            .collect()
    }

    /// Component map of a natural transformation, ordered by object id
    pub fn components(&self, nt: NaturalTransformationId) -> IndexMap<ObjectId, MorphismId> {
        self.owned_edges(RelationKind::Component, nt)
            .into_iter()
            .map(|(key, edge)| (ObjectId::from_node(key.from), MorphismId::from_node(edge.to)))
            .collect()
    }

    /// Property edges of an object, ordered by datatype id
    pub fn properties(&self, object: ObjectId) -> Vec<PropertyEdge> {
        self.owned_edges(RelationKind::Property, object)
            .into_iter()
            .map(|(key, edge)| PropertyEdge {
                object_id: object,
                field_name: edge.label.clone().unwrap_or_default(),
                datatype_id: DatatypeId::from_node(key.from),
            })
            .collect()
    }

    /// Entity counts
    pub fn statistics(&self) -> GraphStatistics {
        let mut stats = GraphStatistics::default();
        for node in self.nodes() {
            match node {
                Node::Category(_) => stats.categories += 1,
                Node::Object(_) => stats.objects += 1,
                Node::Morphism(m) if m.is_identity => stats.identity_morphisms += 1,
                Node::Morphism(_) => stats.morphisms += 1,
                Node::Functor(_) => stats.functors += 1,
                Node::NaturalTransformation(_) => stats.natural_transformations += 1,
                Node::Datatype(_) => stats.datatypes += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Timestamps;
    use crate::store::graph::Write;

    fn category(id: u64, name: &str) -> Node {
        Node::Category(Category {
            id: CategoryId::from_node(NodeId::from_raw(id)),
            name: name.to_string(),
            description: String::new(),
            timestamps: Timestamps::now(),
        })
    }

    fn object(id: u64, category: u64, name: &str) -> Node {
        Node::Object(Object {
            id: ObjectId::from_node(NodeId::from_raw(id)),
            category_id: CategoryId::from_node(NodeId::from_raw(category)),
            name: name.to_string(),
            description: String::new(),
            timestamps: Timestamps::now(),
        })
    }

    fn committed() -> GraphState {
        let mut state = GraphState::new();
        for node in [category(1, "Set"), object(2, 1, "A"), category(3, "Grp"), object(4, 3, "A")] {
            state.apply(Write::Node(node.id(), Some(node)));
        }
        state
    }

    #[test]
    fn test_scoped_queries_do_not_cross_categories() {
        let state = committed();
        let snap = Snapshot::new(&state, None);
        let set = snap.category_by_name("Set").unwrap().id;
        let grp = snap.category_by_name("Grp").unwrap().id;

        let in_set: Vec<_> = snap.objects_in(set).iter().map(|o| o.id.node().raw()).collect();
        let in_grp: Vec<_> = snap.objects_in(grp).iter().map(|o| o.id.node().raw()).collect();
        assert_eq!(in_set, vec![2]);
        assert_eq!(in_grp, vec![4]);
        assert!(snap.object_by_name(set, "A").is_some());
        assert!(!snap.is_staged());
    }

    #[test]
    fn test_overlay_shadows_committed_rows() {
        let state = committed();
        let mut overlay = Overlay::new();
        overlay.stage(Write::Node(NodeId::from_raw(2), None));
        overlay.stage(Write::Node(NodeId::from_raw(5), Some(object(5, 1, "B"))));

        let snap = Snapshot::new(&state, Some(&overlay));
        let set = CategoryId::from_node(NodeId::from_raw(1));
        let names: Vec<_> = snap.objects_in(set).iter().map(|o| o.name.clone()).collect();
        assert_eq!(names, vec!["B".to_string()]);
        assert!(snap.is_staged());

        let stats = snap.statistics();
        assert_eq!(stats.categories, 2);
        assert_eq!(stats.objects, 2);
    }

    #[test]
    fn test_mapping_tables_come_back_in_source_order() {
        let mut state = committed();
        let functor = NodeId::from_raw(10);
        for (from, to) in [(4, 2), (2, 4)] {
            state.apply(Write::Edge(
                EdgeKey::new(RelationKind::ObjectMapping, functor, NodeId::from_raw(from)),
                Some(Edge::to(NodeId::from_raw(to))),
            ));
        }
        let snap = Snapshot::new(&state, None);
        let map = snap.object_map(FunctorId::from_node(functor));
        let sources: Vec<u64> = map.keys().map(|k| k.node().raw()).collect();
        assert_eq!(sources, vec![2, 4]);
        assert_eq!(snap.edges_mentioning(NodeId::from_raw(4)).len(), 2);
    }
}

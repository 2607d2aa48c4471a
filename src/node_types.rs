// Copyright 2025 Cowboy AI, LLC.

//! Kinds of stored entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every kind of node (and node-like record) the graph stores
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Root container of objects and morphisms
    Category,
    /// Member of exactly one category
    Object,
    /// Arrow between two objects of one category
    Morphism,
    /// Map between two categories
    Functor,
    /// Map between two parallel functors
    NaturalTransformation,
    /// Typed literal attached to objects through property edges
    Datatype,
    /// Functor object-map entry
    ObjectMapping,
    /// Functor morphism-map entry
    MorphismMapping,
    /// Natural transformation component
    Component,
    /// Object property edge
    Property,
}

impl EntityKind {
    /// Display name used in messages and previews
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Category => "Category",
            EntityKind::Object => "Object",
            EntityKind::Morphism => "Morphism",
            EntityKind::Functor => "Functor",
            EntityKind::NaturalTransformation => "Natural Transformation",
            EntityKind::Datatype => "Datatype",
            EntityKind::ObjectMapping => "Object Mapping",
            EntityKind::MorphismMapping => "Morphism Mapping",
            EntityKind::Component => "Component",
            EntityKind::Property => "Property",
        }
    }

    /// Whether this kind is stored as an edge rather than a node
    pub fn is_edge(&self) -> bool {
        matches!(
            self,
            EntityKind::ObjectMapping
                | EntityKind::MorphismMapping
                | EntityKind::Component
                | EntityKind::Property
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(EntityKind::NaturalTransformation.to_string(), "Natural Transformation");
        assert_eq!(EntityKind::Object.to_string(), "Object");
    }

    #[test]
    fn test_edge_kinds() {
        assert!(EntityKind::Component.is_edge());
        assert!(EntityKind::Property.is_edge());
        assert!(!EntityKind::Morphism.is_edge());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&EntityKind::NaturalTransformation).unwrap();
        assert_eq!(json, "\"natural_transformation\"");
    }
}

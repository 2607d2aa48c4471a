// Copyright 2025 Cowboy AI, LLC.

//! Structural and law validation
//!
//! Every check here is advisory: it reads a snapshot and returns
//! diagnostics, it never blocks a write. Law checks compare shapes
//! (sources and targets) only; they never decide whether two morphisms are
//! equal.

mod laws;
mod structure;

pub use laws::{validate_functor_laws, validate_naturality};
pub use structure::{validate_category_structure, validate_functor_structure, validate_nt_structure};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::NodeId;

/// Result of one best-effort law check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// Both sides have the same shape
    WellTyped,
    /// A mapping or component needed for the check is absent
    MissingData,
    /// Shapes disagree
    NotWellTyped,
}

impl Outcome {
    /// Label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::WellTyped => "well-typed",
            Outcome::MissingData => "missing data",
            Outcome::NotWellTyped => "not well-typed",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which law a check is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Law {
    /// F(f) goes from F(dom f) to F(cod f)
    Endpoints,
    /// F(id_X) is the identity on F(X)
    Identity,
    /// F(g)∘F(f) is defined wherever g∘f is
    Composition,
    /// G(f)∘α_X and α_Y∘F(f) have the same shape
    Naturality,
}

/// One law check for one morphism (or composable pair)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawCheck {
    /// Law checked
    pub law: Law,
    /// Morphism the check is about (the first of a pair)
    pub subject: NodeId,
    /// Tagged result
    pub outcome: Outcome,
    /// Human readable diagnostic
    pub message: String,
}

impl LawCheck {
    pub(crate) fn new(law: Law, subject: impl Into<NodeId>, outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            law,
            subject: subject.into(),
            outcome,
            message: message.into(),
        }
    }

    /// Whether the shapes matched
    pub fn is_well_typed(&self) -> bool {
        self.outcome == Outcome::WellTyped
    }
}

impl fmt::Display for LawCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Diagnostic strings of a list of law checks
pub fn messages(checks: &[LawCheck]) -> Vec<String> {
    checks.iter().map(ToString::to_string).collect()
}

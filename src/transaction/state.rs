// Copyright 2025 Cowboy AI, LLC.

//! Transaction state machine
//!
//! An editing session is either `Idle` (every repository call commits on its
//! own) or `Active` (calls are staged until commit or rollback). Transitions
//! are edges guarded by inputs; anything not listed is rejected.

use serde::{Deserialize, Serialize};

use crate::errors::CategoryError;

/// States of the editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransactionState {
    /// No transaction; repository calls auto-commit
    #[default]
    Idle,
    /// Changes are staged in the overlay
    Active,
}

/// Inputs that drive transaction transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionInput {
    /// Start staging
    Begin,
    /// Apply the overlay
    Commit,
    /// Discard the overlay
    Rollback,
    /// Pop one staged change
    Undo,
}

impl TransactionInput {
    /// Verb used in error messages
    pub fn verb(&self) -> &'static str {
        match self {
            TransactionInput::Begin => "begin",
            TransactionInput::Commit => "commit",
            TransactionInput::Rollback => "rollback",
            TransactionInput::Undo => "undo",
        }
    }
}

impl TransactionState {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            TransactionState::Idle => "Idle",
            TransactionState::Active => "Active",
        }
    }

    /// Whether a transaction is open
    pub fn is_active(&self) -> bool {
        matches!(self, TransactionState::Active)
    }

    /// Check whether moving to `target` on `input` is allowed
    pub fn can_transition_to(&self, target: &Self, input: &TransactionInput) -> bool {
        self.valid_transitions(input).contains(target)
    }

    /// States reachable from here on `input`
    pub fn valid_transitions(&self, input: &TransactionInput) -> Vec<Self> {
        use TransactionInput as I;
        use TransactionState as S;
        match (*self, input) {
            (S::Idle, I::Begin) => vec![S::Active],
            (S::Active, I::Commit) | (S::Active, I::Rollback) => vec![S::Idle],
            (S::Active, I::Undo) => vec![S::Active],
            _ => Vec::new(),
        }
    }

    /// Follow the edge for `input`, or report the rejected call
    pub fn transition(&self, input: TransactionInput) -> Result<Self, CategoryError> {
        self.valid_transitions(&input)
            .into_iter()
            .next()
            .ok_or(CategoryError::TransactionState {
                state: self.name(),
                attempted: input.verb(),
            })
    }
}

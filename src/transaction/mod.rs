// Copyright 2025 Cowboy AI, LLC.

//! Transactions: staging, commit, rollback and undo

mod change_log;
mod manager;
mod state;

pub use change_log::{ChangeEntry, ChangeLog, Operation, Record, StagedOperation};
pub use manager::{TransactionManager, WriteBatch};
pub use state::{TransactionInput, TransactionState};

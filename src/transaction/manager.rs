// Copyright 2025 Cowboy AI, LLC.

//! Transaction manager
//!
//! Owns the graph store and the editing session. Repository operations run
//! through [`TransactionManager::execute`]: while a transaction is active
//! their writes are staged and logged, otherwise they run in a private
//! overlay that is committed as soon as the operation succeeds.

use tracing::{debug, info, warn};

use crate::entity::GraphEntity;
use crate::errors::{CategoryError, CategoryResult};
use crate::identifiers::{NodeId, TransactionId};
use crate::relationship_types::{Edge, EdgeKey};
use crate::store::{ChangeSet, GraphStore, Snapshot, Write};

use super::change_log::{ChangeEntry, ChangeLog, Record, StagedOperation};
use super::state::{TransactionInput, TransactionState};

/// Staging handle given to a repository operation
pub struct WriteBatch<'a> {
    store: &'a mut GraphStore,
    log: &'a mut ChangeLog,
}

impl<'a> WriteBatch<'a> {
    /// Current view including everything staged so far
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.store.snapshot()
    }

    /// Hand out the next node id
    pub fn allocate_id(&mut self) -> NodeId {
        self.store.allocate_id()
    }

    /// Log and stage one write
    ///
    /// Removing a row that is not there is a no-op.
    pub fn write(&mut self, write: Write) {
        let snapshot = self.store.snapshot();
        let before = match &write {
            Write::Node(id, _) => snapshot.node(*id).cloned().map(|node| Record::Node { node }),
            Write::Edge(key, _) => snapshot.edge(key).cloned().map(|edge| Record::Edge { key: *key, edge }),
        };
        let restore = self.store.prior(&write);
        let Some(entry) = ChangeEntry::new(&write, before, restore) else {
            debug!(write = ?write, "Nothing to stage");
            return;
        };
        debug!(change = %entry.summary, "Staged change");
        self.log.record(entry);
        self.store.stage(write);
    }

    /// Create or replace an entity
    pub fn put<E: GraphEntity>(&mut self, entity: E) {
        let id = entity.id().node();
        self.write(Write::Node(id, Some(entity.into_node())));
    }

    /// Remove a node
    pub fn remove_node(&mut self, id: impl Into<NodeId>) {
        self.write(Write::Node(id.into(), None));
    }

    /// Create or replace an edge
    pub fn put_edge(&mut self, key: EdgeKey, edge: Edge) {
        self.write(Write::Edge(key, Some(edge)));
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, key: EdgeKey) {
        self.write(Write::Edge(key, None));
    }
}

/// Editing session over a graph store
#[derive(Debug)]
pub struct TransactionManager {
    store: GraphStore,
    state: TransactionState,
    transaction_id: Option<TransactionId>,
    log: ChangeLog,
}

impl TransactionManager {
    /// Idle session over `store`
    pub fn new(store: GraphStore) -> Self {
        Self {
            store,
            state: TransactionState::Idle,
            transaction_id: None,
            log: ChangeLog::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> TransactionState {
        self.state
    }

    /// Id of the active transaction
    pub fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    /// Current view: staged rows over committed rows
    pub fn snapshot(&self) -> Snapshot<'_> {
        self.store.snapshot()
    }

    /// Committed rows only
    pub fn committed(&self) -> Snapshot<'_> {
        self.store.committed()
    }

    /// Staged operations, oldest first
    pub fn pending_changes(&self) -> &[StagedOperation] {
        self.log.operations()
    }

    /// Start staging
    pub fn begin(&mut self) -> CategoryResult<TransactionId> {
        self.state = self.state.transition(TransactionInput::Begin)?;
        let id = TransactionId::new();
        self.transaction_id = Some(id);
        self.log.clear();
        self.store.open_overlay();
        info!(transaction_id = %id, "Transaction started");
        Ok(id)
    }

    /// Apply the overlay atomically
    ///
    /// A storage failure leaves the committed layer untouched and the
    /// transaction active with its overlay and log intact.
    pub fn commit(&mut self) -> CategoryResult<ChangeSet> {
        let next = self.state.transition(TransactionInput::Commit)?;
        let (operations, rows) = (self.log.len(), self.log.row_count());
        match self.store.commit_overlay() {
            Ok(changes) => {
                info!(
                    transaction_id = ?self.transaction_id,
                    operations,
                    rows,
                    "Transaction committed"
                );
                self.state = next;
                self.transaction_id = None;
                self.log.clear();
                Ok(changes)
            }
            Err(err) => {
                warn!(
                    transaction_id = ?self.transaction_id,
                    error = %err,
                    "Commit failed; transaction remains active"
                );
                Err(err.into())
            }
        }
    }

    /// Discard the overlay and the log, returning how many operations were dropped
    pub fn rollback(&mut self) -> CategoryResult<usize> {
        self.state = self.state.transition(TransactionInput::Rollback)?;
        let dropped = self.log.len();
        self.store.discard_overlay();
        self.log.clear();
        let transaction_id = self.transaction_id.take();
        info!(transaction_id = ?transaction_id, dropped, "Transaction rolled back");
        Ok(dropped)
    }

    /// Reverse the newest staged operation with every row it cascaded to
    pub fn undo_last(&mut self) -> CategoryResult<Option<StagedOperation>> {
        self.state = self.state.transition(TransactionInput::Undo)?;
        let operation = self.pop_operation();
        if let Some(operation) = &operation {
            debug!(
                sequence = operation.sequence,
                change = %operation.change.summary,
                rows = operation.row_count(),
                "Undid operation"
            );
        }
        Ok(operation)
    }

    fn pop_operation(&mut self) -> Option<StagedOperation> {
        let mut operation = self.log.pop()?;
        for restore in operation.take_restores() {
            self.store.restore(restore);
        }
        Some(operation)
    }

    /// Run one repository operation
    ///
    /// Active: the writes stay staged; on error every write the operation
    /// made is undone. Idle: the writes are committed on success and dropped
    /// on error, so a failed call never leaves a partial row behind.
    pub fn execute<T, F>(&mut self, op: F) -> CategoryResult<(T, ChangeSet)>
    where
        F: FnOnce(&mut WriteBatch<'_>) -> CategoryResult<T>,
    {
        if self.state.is_active() {
            let mark = self.log.len();
            self.log.start_operation();
            let result = op(&mut WriteBatch {
                store: &mut self.store,
                log: &mut self.log,
            });
            if result.is_err() && self.log.len() > mark {
                self.pop_operation();
            }
            return result.map(|value| (value, ChangeSet::default()));
        }

        let mut scratch = ChangeLog::new();
        scratch.start_operation();
        self.store.open_overlay();
        let result = op(&mut WriteBatch {
            store: &mut self.store,
            log: &mut scratch,
        });
        let value = match result {
            Ok(value) => value,
            Err(err) => {
                self.store.discard_overlay();
                return Err(err);
            }
        };
        match self.store.commit_overlay() {
            Ok(changes) => {
                debug!(rows = scratch.row_count(), "Auto-committed");
                Ok((value, changes))
            }
            Err(err) => {
                self.store.discard_overlay();
                Err(CategoryError::Storage(err))
            }
        }
    }
}

// Copyright 2025 Cowboy AI, LLC.

//! Change log of a transaction
//!
//! Every staged write is recorded with the row it replaced and the row it
//! wrote, grouped under the repository call that made it. The log backs the
//! commit preview and per-operation undo.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::NodeId;
use crate::model::Node;
use crate::node_types::EntityKind;
use crate::relationship_types::{Edge, EdgeKey};
use crate::store::{Restore, Write};

/// Kind of change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Row did not exist before
    Create,
    /// Row replaced
    Update,
    /// Row removed
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        };
        f.write_str(s)
    }
}

/// A row as it was before or after a change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    /// Node row
    Node {
        /// The node
        node: Node,
    },
    /// Edge row
    Edge {
        /// Edge key
        key: EdgeKey,
        /// Edge value
        edge: Edge,
    },
}

/// One staged row change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Create, update or delete
    pub operation: Operation,
    /// Kind of the changed row
    pub entity: EntityKind,
    /// Node id, or the owner of an edge
    pub id: NodeId,
    /// Row before the change
    pub before: Option<Record>,
    /// Row after the change
    pub after: Option<Record>,
    /// One-line description for previews
    pub summary: String,
    #[serde(skip)]
    restore: Option<Restore>,
}

impl ChangeEntry {
    /// Describe `write` against the row it replaces
    ///
    /// Returns `None` when there is nothing to record: removing a row that
    /// does not exist, or writing an edge kind that is never stored.
    pub(crate) fn new(write: &Write, before: Option<Record>, restore: Restore) -> Option<Self> {
        let (id, after) = match write {
            Write::Node(id, node) => (*id, node.clone().map(|node| Record::Node { node })),
            Write::Edge(key, edge) => (key.owner, edge.clone().map(|edge| Record::Edge { key: *key, edge })),
        };
        let entity = after.as_ref().or(before.as_ref())?.entity_kind()?;
        let operation = match (&before, &after) {
            (None, _) => Operation::Create,
            (Some(_), None) => Operation::Delete,
            (Some(_), Some(_)) => Operation::Update,
        };
        let summary = summarize(operation, entity, before.as_ref(), after.as_ref());
        Some(Self {
            operation,
            entity,
            id,
            before,
            after,
            summary,
            restore: Some(restore),
        })
    }

    /// Overlay cell to put back when this entry is undone
    pub(crate) fn take_restore(&mut self) -> Option<Restore> {
        self.restore.take()
    }
}

impl Record {
    /// Kind of the recorded row
    pub fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Record::Node { node } => Some(node.kind()),
            Record::Edge { key, .. } => key.kind.entity_kind(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Record::Node { node } => format!("'{}' (#{})", node.name(), node.id()),
            Record::Edge { key, edge } => match &edge.label {
                Some(label) => format!("'{}' #{} -> #{} on #{}", label, key.from, edge.to, key.owner),
                None => format!("#{} -> #{} on #{}", key.from, edge.to, key.owner),
            },
        }
    }
}

fn summarize(operation: Operation, entity: EntityKind, before: Option<&Record>, after: Option<&Record>) -> String {
    match (before, after) {
        (Some(old), Some(new)) if old.describe() != new.describe() => {
            format!("{operation} {entity} {} => {}", old.describe(), new.describe())
        }
        (_, Some(record)) | (Some(record), None) => {
            format!("{operation} {entity} {}", record.describe())
        }
        (None, None) => format!("{operation} {entity}"),
    }
}

impl fmt::Display for ChangeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary)
    }
}

/// Everything one repository call staged
///
/// `change` is the row the call was about; `cascaded` holds the rows it
/// touched on the way, in write order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedOperation {
    /// Position in the transaction, starting at 1
    pub sequence: u64,
    /// First row written
    pub change: ChangeEntry,
    /// Rows written after it
    pub cascaded: Vec<ChangeEntry>,
}

impl StagedOperation {
    /// Every row, in write order
    pub fn changes(&self) -> impl Iterator<Item = &ChangeEntry> {
        std::iter::once(&self.change).chain(self.cascaded.iter())
    }

    /// Number of rows written
    pub fn row_count(&self) -> usize {
        1 + self.cascaded.len()
    }

    /// Overlay cells to put back, newest write first
    pub(crate) fn take_restores(&mut self) -> Vec<Restore> {
        let mut restores: Vec<Restore> = self
            .cascaded
            .iter_mut()
            .rev()
            .filter_map(ChangeEntry::take_restore)
            .collect();
        restores.extend(self.change.take_restore());
        restores
    }
}

impl fmt::Display for StagedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.sequence, self.change)?;
        for entry in &self.cascaded {
            write!(f, "\n   - {entry}")?;
        }
        Ok(())
    }
}

/// Staged operations of one transaction, oldest first
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    operations: Vec<StagedOperation>,
    next_sequence: u64,
    open: bool,
}

impl ChangeLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// The next recorded row heads a new operation
    pub(crate) fn start_operation(&mut self) {
        self.open = true;
    }

    /// Record a row change under the current operation
    pub(crate) fn record(&mut self, entry: ChangeEntry) {
        match self.operations.last_mut() {
            Some(current) if !self.open => current.cascaded.push(entry),
            _ => {
                self.next_sequence += 1;
                self.operations.push(StagedOperation {
                    sequence: self.next_sequence,
                    change: entry,
                    cascaded: Vec::new(),
                });
                self.open = false;
            }
        }
    }

    /// Remove and return the newest operation
    pub(crate) fn pop(&mut self) -> Option<StagedOperation> {
        let operation = self.operations.pop()?;
        self.next_sequence = operation.sequence - 1;
        Some(operation)
    }

    /// Operations in the order they were staged
    pub fn operations(&self) -> &[StagedOperation] {
        &self.operations
    }

    /// Number of operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Number of row changes across all operations
    pub fn row_count(&self) -> usize {
        self.operations.iter().map(StagedOperation::row_count).sum()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Drop every operation and restart numbering
    pub fn clear(&mut self) {
        self.operations.clear();
        self.next_sequence = 0;
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{GraphEntity, Timestamps};
    use crate::model::{Category, CategoryId, Object, ObjectId};
    use crate::relationship_types::RelationKind;

    fn category(name: &str) -> Node {
        Category {
            id: CategoryId::from_node(NodeId::from_raw(1)),
            name: name.to_string(),
            description: String::new(),
            timestamps: Timestamps::now(),
        }
        .into_node()
    }

    fn restore() -> Restore {
        Restore::Node(NodeId::from_raw(1), None)
    }

    fn entry(write: Write, before: Option<Record>) -> ChangeEntry {
        ChangeEntry::new(&write, before, restore()).unwrap()
    }

    #[test]
    fn test_operation_follows_before_and_after() {
        let id = NodeId::from_raw(1);

        let create = entry(Write::Node(id, Some(category("Set"))), None);
        assert_eq!(create.operation, Operation::Create);
        assert_eq!(create.entity, EntityKind::Category);
        assert_eq!(create.summary, "Create Category 'Set' (#1)");

        let before = Some(Record::Node { node: category("Set") });
        let update = entry(Write::Node(id, Some(category("Sets"))), before.clone());
        assert_eq!(update.operation, Operation::Update);
        assert_eq!(update.summary, "Update Category 'Set' (#1) => 'Sets' (#1)");

        let delete = entry(Write::Node(id, None), before);
        assert_eq!(delete.operation, Operation::Delete);
        assert_eq!(delete.entity, EntityKind::Category);
        assert_eq!(delete.to_string(), "Delete Category 'Set' (#1)");
    }

    #[test]
    fn test_delete_takes_kind_from_removed_row() {
        let object = Object {
            id: ObjectId::from_node(NodeId::from_raw(2)),
            name: "A".to_string(),
            description: String::new(),
            category_id: CategoryId::from_node(NodeId::from_raw(1)),
            timestamps: Timestamps::now(),
        }
        .into_node();
        let before = Some(Record::Node { node: object });
        let delete = entry(Write::Node(NodeId::from_raw(2), None), before);
        assert_eq!(delete.entity, EntityKind::Object);
        assert_eq!(delete.summary, "Delete Object 'A' (#2)");
    }

    #[test]
    fn test_nothing_to_record() {
        let missing = Write::Node(NodeId::from_raw(5), None);
        assert!(ChangeEntry::new(&missing, None, restore()).is_none());

        let key = EdgeKey::new(RelationKind::Includes, NodeId::from_raw(1), NodeId::from_raw(2));
        let structural = Write::Edge(key, Some(Edge::to(NodeId::from_raw(2))));
        assert!(ChangeEntry::new(&structural, None, Restore::Edge(key, None)).is_none());
    }

    #[test]
    fn test_edge_entries_use_owner_id() {
        let key = EdgeKey::new(RelationKind::Property, NodeId::from_raw(4), NodeId::from_raw(9));
        let write = Write::Edge(key, Some(Edge::to(NodeId::from_raw(9)).with_label("weight")));
        let entry = ChangeEntry::new(&write, None, Restore::Edge(key, None)).unwrap();
        assert_eq!(entry.entity, EntityKind::Property);
        assert_eq!(entry.id, NodeId::from_raw(4));
        assert_eq!(entry.summary, "Create Property 'weight' #9 -> #9 on #4");
    }

    #[test]
    fn test_rows_group_under_their_operation() {
        let mut log = ChangeLog::new();
        log.start_operation();
        log.record(entry(Write::Node(NodeId::from_raw(1), Some(category("Set"))), None));
        log.start_operation();
        log.record(entry(Write::Node(NodeId::from_raw(1), Some(category("Sets"))), None));
        log.record(entry(Write::Node(NodeId::from_raw(1), Some(category("Grp"))), None));

        assert_eq!(log.len(), 2);
        assert_eq!(log.row_count(), 3);
        let second = &log.operations()[1];
        assert_eq!(second.sequence, 2);
        assert_eq!(second.changes().count(), 2);
        assert_eq!(
            second.to_string(),
            "2. Create Category 'Sets' (#1)\n   - Create Category 'Grp' (#1)"
        );

        let mut popped = log.pop().unwrap();
        assert_eq!(popped.take_restores().len(), 2);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_clear_restarts_sequence() {
        let mut log = ChangeLog::new();
        log.start_operation();
        log.record(entry(Write::Node(NodeId::from_raw(1), Some(category("Set"))), None));
        log.clear();
        assert!(log.is_empty());
        log.start_operation();
        log.record(entry(Write::Node(NodeId::from_raw(1), Some(category("Set"))), None));
        assert_eq!(log.operations()[0].sequence, 1);
    }

    #[test]
    fn test_operations_serialize_without_restore() {
        let mut log = ChangeLog::new();
        log.start_operation();
        log.record(entry(Write::Node(NodeId::from_raw(1), Some(category("Set"))), None));
        let json = serde_json::to_value(&log.operations()[0]).unwrap();
        assert_eq!(json["sequence"], 1);
        assert_eq!(json["change"]["operation"], "Create");
        assert_eq!(json["change"]["after"]["record"], "node");
        assert!(json["change"].get("restore").is_none());
        assert_eq!(json["cascaded"], serde_json::json!([]));
    }
}

//! Owned, serializable copies of element subtrees.
//!
//! A snapshot is a flat pre-order list of records, each carrying its depth
//! below the snapshot root. Nesting never appears in the serialized form, so
//! tree depth is not bounded by the deserializer's recursion limit.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::arena::{NodeId, NodeRef, XmlArena};
use crate::domain::entities::{Attribute, ElementSpec, Value};
use crate::domain::error::{DomainError, DomainResult};

/// One element of a snapshot. `depth` is 0 for the snapshot root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub depth: usize,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl SnapshotRecord {
    fn spec(&self) -> ElementSpec {
        ElementSpec {
            tag: self.tag.clone(),
            attribute: self.attribute.clone(),
            value: self.value.clone(),
        }
    }
}

/// A subtree detached from any arena, suitable for persisting between runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub elements: Vec<SnapshotRecord>,
}

impl ElementSnapshot {
    /// Number of elements in the snapshot, root included.
    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// Checks the record sequence describes exactly one tree: the first record
    /// is the only one at depth 0 and no record is more than one level below
    /// its predecessor.
    pub fn validate(&self) -> DomainResult<()> {
        let mut records = self.elements.iter().enumerate();
        match records.next() {
            Some((_, first)) if first.depth == 0 => {}
            Some(_) => return Err(DomainError::invalid("snapshot root must have depth 0")),
            None => return Err(DomainError::invalid("snapshot has no elements")),
        }
        let mut previous = 0;
        for (position, record) in records {
            if record.depth == 0 || record.depth > previous + 1 {
                return Err(DomainError::invalid(format!(
                    "snapshot record {} has depth {} after depth {}",
                    position, record.depth, previous
                )));
            }
            previous = record.depth;
        }
        Ok(())
    }
}

/// Values JSON cannot represent. serde_json writes them as `null`, which
/// would read back as "no value".
fn check_storable(node: NodeRef<'_>) -> DomainResult<()> {
    match node.value() {
        Some(Value::Float(x)) if !x.is_finite() => Err(DomainError::invalid(format!(
            "cannot snapshot non-finite value {} of <{}> at path {}",
            x,
            node.tag(),
            node.path()
        ))),
        _ => Ok(()),
    }
}

impl XmlArena {
    /// Flattens the subtree at `id` into pre-order records.
    ///
    /// Fails with `InvalidOperation` if any element holds a NaN or infinite
    /// float.
    #[instrument(level = "debug", skip(self))]
    pub fn snapshot(&self, id: NodeId) -> DomainResult<ElementSnapshot> {
        let start = self.node(id)?;
        let mut elements = Vec::new();
        let mut stack = vec![(start, 0usize)];

        while let Some((node, depth)) = stack.pop() {
            check_storable(node)?;
            elements.push(SnapshotRecord {
                depth,
                tag: node.tag().to_string(),
                attribute: node.attribute().cloned(),
                value: node.value().cloned(),
            });
            stack.extend(node.children().rev().map(|c| (c, depth + 1)));
        }
        Ok(ElementSnapshot { elements })
    }

    /// Rebuilds `snapshot` as a new tree and returns its root.
    ///
    /// The record sequence is validated before any element is created.
    #[instrument(level = "debug", skip_all, fields(elements = snapshot.size()))]
    pub fn restore(&mut self, snapshot: &ElementSnapshot) -> DomainResult<NodeId> {
        snapshot.validate()?;
        let (first, rest) = snapshot
            .elements
            .split_first()
            .ok_or_else(|| DomainError::invalid("snapshot has no elements"))?;

        let root = self.new_node(first.spec(), true);
        // open ancestors of the next record, indexed by depth
        let mut open = vec![root];
        for record in rest {
            open.truncate(record.depth);
            let parent = *open
                .last()
                .ok_or_else(|| DomainError::invalid("snapshot record without parent"))?;
            open.push(self.make_child(parent, record.spec())?);
        }
        Ok(root)
    }
}

// Associative tree builder - traverses the record graph from the two head
// records, following TableRef edges, and reports cycles instead of looping

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::parser::model::{Record, RecordCollection};
use crate::parser::value_type::ValueType;

/// Annotation on a tree node. `Circular` marks a path that revisited one of
/// its own ancestors and was cut there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeTag {
    None,
    HeadEntity,
    HeadConstraint,
    Circular,
}

/// Label used for references that resolve to no record.
pub const UNDEFINED_LABEL: &str = "(undefined edict)";

/// Serializable traversal artifact. No back references and no cycles by
/// construction; a node without children is a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub tag: NodeTag,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(id: impl Into<String>, tag: NodeTag) -> Self {
        Self {
            id: id.into(),
            tag,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total node count of this subtree, itself included.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// Progress observation hook. `done` is the number of processed worklist
/// items so far, `left` the current worklist size.
pub trait ProgressSink {
    fn report(&mut self, done: u64, left: u64);
}

/// Sink for callers that don't observe progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _done: u64, _left: u64) {}
}

/// Arena slot: children are buffered here and the final tree is
/// materialized only after the worklist drains, so no node is mutated after
/// being handed out.
struct PendingNode {
    id: String,
    tag: NodeTag,
    children: Vec<usize>,
}

struct WorkItem<'a> {
    record: Option<&'a Record>,
    parent: usize,
    ancestors: Vec<String>,
}

/// Build the associative forest rooted at the head entity and head
/// constraint. Iterative FIFO worklist; each path carries its own ancestor
/// list, so a record may appear as separate expanded subtrees under
/// disjoint chains while any path revisiting an ancestor is cut with a
/// `Circular` leaf. Progress is reported through `sink` at `cadence`
/// intervals of wall-clock time, not per item.
pub fn build_forest<S: ProgressSink>(
    collection: &RecordCollection,
    cadence: Duration,
    sink: &mut S,
) -> (Vec<TreeNode>, u64) {
    let mut arena: Vec<PendingNode> = vec![PendingNode {
        id: String::new(),
        tag: NodeTag::None,
        children: Vec::new(),
    }];
    const ROOT: usize = 0;

    let mut worklist: VecDeque<WorkItem<'_>> = VecDeque::new();
    worklist.push_back(WorkItem {
        record: collection.head_entity(),
        parent: ROOT,
        ancestors: Vec::new(),
    });
    worklist.push_back(WorkItem {
        record: collection.head_constraint(),
        parent: ROOT,
        ancestors: Vec::new(),
    });

    let mut done: u64 = 0;
    sink.report(done, worklist.len() as u64);
    let mut last_report = Instant::now();

    while let Some(item) = worklist.pop_front() {
        process_item(collection, &mut arena, &mut worklist, item);
        done += 1;

        if last_report.elapsed() >= cadence {
            sink.report(done, worklist.len() as u64);
            last_report = Instant::now();
        }
    }

    (materialize(&arena, ROOT).children, done)
}

fn process_item<'a>(
    collection: &'a RecordCollection,
    arena: &mut Vec<PendingNode>,
    worklist: &mut VecDeque<WorkItem<'a>>,
    item: WorkItem<'a>,
) {
    let WorkItem {
        record,
        parent,
        ancestors,
    } = item;

    let Some(record) = record else {
        attach(arena, parent, PendingNode {
            id: UNDEFINED_LABEL.to_string(),
            tag: NodeTag::None,
            children: Vec::new(),
        });
        return;
    };

    let id = record.id();

    if ancestors.iter().any(|a| a == id) {
        // The path ran into itself; cut here so traversal terminates
        attach(arena, parent, PendingNode {
            id: id.to_string(),
            tag: NodeTag::Circular,
            children: Vec::new(),
        });
        return;
    }

    let tag = if record.is_entity() && collection.head_entity_id() == Some(id) {
        NodeTag::HeadEntity
    } else if !record.is_entity() && collection.head_constraint_id() == Some(id) {
        NodeTag::HeadConstraint
    } else {
        NodeTag::None
    };

    let node_idx = attach(arena, parent, PendingNode {
        id: id.to_string(),
        tag,
        children: Vec::new(),
    });

    let mut next_ancestors = ancestors;
    next_ancestors.push(id.to_string());

    for expr in record.expressions() {
        if expr.left_type() == ValueType::TableRef {
            worklist.push_back(WorkItem {
                record: collection.get_edict(expr.left_value()),
                parent: node_idx,
                ancestors: next_ancestors.clone(),
            });
        }
        if expr.right_type() == ValueType::TableRef {
            worklist.push_back(WorkItem {
                record: collection.get_edict(expr.right_value()),
                parent: node_idx,
                ancestors: next_ancestors.clone(),
            });
        }
    }
}

fn attach(arena: &mut Vec<PendingNode>, parent: usize, node: PendingNode) -> usize {
    let idx = arena.len();
    arena.push(node);
    arena[parent].children.push(idx);
    idx
}

fn materialize(arena: &[PendingNode], idx: usize) -> TreeNode {
    let pending = &arena[idx];
    let mut node = TreeNode::new(pending.id.clone(), pending.tag);
    node.children = pending
        .children
        .iter()
        .map(|&child| materialize(arena, child))
        .collect();
    node
}

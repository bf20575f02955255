//! Template-driven folding of filled rows into a [`ResultNode`] tree.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use crate::data::model::{Cell, Row};

use super::template::Template;

// ---------------------------------------------------------------------------
// Result tree
// ---------------------------------------------------------------------------

/// Key of one nesting level: a single cell, or a tuple when the group spans
/// several columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Scalar(Cell),
    Composite(Vec<Cell>),
}

impl Key {
    fn from_cells(cells: &[Cell]) -> Self {
        match cells {
            [single] => Key::Scalar(single.clone()),
            many => Key::Composite(many.to_vec()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Scalar(c) => write!(f, "{c}"),
            Key::Composite(cells) => {
                f.write_str("(")?;
                for (i, c) in cells.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// One entry of leaf content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LeafItem {
    /// The value of a one-column leaf group.
    Value(Cell),
    /// All values of a multi-column leaf group, in column order.
    Record(Vec<Cell>),
}

impl LeafItem {
    fn from_cells(cells: &[Cell]) -> Self {
        match cells {
            [single] => LeafItem::Value(single.clone()),
            many => LeafItem::Record(many.to_vec()),
        }
    }

    /// Whether every value of the item is null.
    pub fn is_null(&self) -> bool {
        match self {
            LeafItem::Value(c) => c.is_null(),
            LeafItem::Record(cells) => cells.iter().all(Cell::is_null),
        }
    }
}

/// The nested result of an extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultNode {
    /// Keys in first-occurrence order, each mapped to its sub-tree.
    Branch(Vec<(Key, ResultNode)>),
    /// Leaf items in row order, duplicates kept.
    Leaf(Vec<LeafItem>),
}

impl ResultNode {
    /// Look up a direct child by key.
    pub fn get(&self, key: &Key) -> Option<&ResultNode> {
        match self {
            ResultNode::Branch(entries) => {
                entries.iter().find(|(k, _)| k == key).map(|(_, node)| node)
            }
            ResultNode::Leaf(_) => None,
        }
    }

    /// Follow a path of keys from this node.
    pub fn path<'a>(&self, keys: impl IntoIterator<Item = &'a Key>) -> Option<&ResultNode> {
        keys.into_iter().try_fold(self, |node, key| node.get(key))
    }

    /// Keys of a branch in iteration order; empty for leaves.
    pub fn keys(&self) -> Vec<&Key> {
        match self {
            ResultNode::Branch(entries) => entries.iter().map(|(k, _)| k).collect(),
            ResultNode::Leaf(_) => Vec::new(),
        }
    }

    pub fn as_leaf(&self) -> Option<&[LeafItem]> {
        match self {
            ResultNode::Leaf(items) => Some(items),
            ResultNode::Branch(_) => None,
        }
    }

    /// Number of direct entries (keys of a branch, items of a leaf).
    pub fn len(&self) -> usize {
        match self {
            ResultNode::Branch(entries) => entries.len(),
            ResultNode::Leaf(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all-null leaf items, then every branch entry left without content.
    pub fn prune_empty_leaves(self) -> ResultNode {
        match self {
            ResultNode::Leaf(items) => {
                ResultNode::Leaf(items.into_iter().filter(|i| !i.is_null()).collect())
            }
            ResultNode::Branch(entries) => ResultNode::Branch(
                entries
                    .into_iter()
                    .map(|(k, node)| (k, node.prune_empty_leaves()))
                    .filter(|(_, node)| !node.is_empty())
                    .collect(),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Fold `rows` into a tree shaped by `template`.
///
/// Every row must be at least `template.width()` cells wide; the facade
/// checks this before calling. Columns past the template are never read.
pub fn group(rows: &[Row], template: &Template) -> ResultNode {
    let refs: Vec<&Row> = rows.iter().collect();
    fold(&refs, &template.spans())
}

fn fold(rows: &[&Row], spans: &[Range<usize>]) -> ResultNode {
    match spans {
        [] => ResultNode::Leaf(Vec::new()),
        [leaf] => ResultNode::Leaf(
            rows.iter()
                .map(|row| LeafItem::from_cells(&row[leaf.clone()]))
                .collect(),
        ),
        [current, rest @ ..] => ResultNode::Branch(
            partition(rows, current)
                .into_iter()
                .map(|(key, subset)| {
                    let child = fold(&subset, rest);
                    (key, child)
                })
                .collect(),
        ),
    }
}

/// Split rows by their key over `span`, keeping keys in first-occurrence order.
fn partition<'r>(rows: &[&'r Row], span: &Range<usize>) -> Vec<(Key, Vec<&'r Row>)> {
    let mut index: HashMap<Key, usize> = HashMap::new();
    let mut buckets: Vec<(Key, Vec<&'r Row>)> = Vec::new();

    for &row in rows {
        let key = Key::from_cells(&row[span.clone()]);
        match index.get(&key) {
            Some(&slot) => buckets[slot].1.push(row),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![row]));
            }
        }
    }
    buckets
}

//! Rendering of [`ResultNode`] trees for output.

use std::fmt::Write as _;

use serde_json::map::Entry;
use serde_json::{Map, Number, Value as JsonValue};

use crate::data::model::Cell;
use crate::engine::{Key, LeafItem, ResultNode};

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Render a tree as JSON. Branches become objects in key order, leaves become
/// arrays. JSON object keys are strings, so scalar keys use their text form
/// and composite keys the compact array text, e.g. `[2023,"Q1"]`.
///
/// Keys that render to the same string (`Int(1)` and `Text("1")`) share one
/// object entry at the position of the first: their leaf arrays are
/// concatenated and their sub-objects merged, so no row is lost.
pub fn to_json(node: &ResultNode) -> JsonValue {
    match node {
        ResultNode::Branch(entries) => {
            let mut map = Map::with_capacity(entries.len());
            for (key, child) in entries {
                insert_merged(&mut map, key_text(key), to_json(child));
            }
            JsonValue::Object(map)
        }
        ResultNode::Leaf(items) => JsonValue::Array(items.iter().map(leaf_to_json).collect()),
    }
}

pub fn cell_to_json(cell: &Cell) -> JsonValue {
    match cell {
        Cell::Text(s) | Cell::Date(s) => JsonValue::String(s.clone()),
        Cell::Int(i) => JsonValue::Number((*i).into()),
        Cell::Float(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Cell::Bool(b) => JsonValue::Bool(*b),
        Cell::Null => JsonValue::Null,
    }
}

fn leaf_to_json(item: &LeafItem) -> JsonValue {
    match item {
        LeafItem::Value(cell) => cell_to_json(cell),
        LeafItem::Record(cells) => JsonValue::Array(cells.iter().map(cell_to_json).collect()),
    }
}

fn insert_merged(map: &mut Map<String, JsonValue>, key: String, value: JsonValue) {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => merge_json(slot.get_mut(), value),
    }
}

/// Siblings of one level always share a shape: both arrays or both objects.
fn merge_json(into: &mut JsonValue, from: JsonValue) {
    match (into, from) {
        (JsonValue::Array(items), JsonValue::Array(more)) => items.extend(more),
        (JsonValue::Object(entries), JsonValue::Object(more)) => {
            for (key, value) in more {
                insert_merged(entries, key, value);
            }
        }
        (slot, other) => *slot = other,
    }
}

fn key_text(key: &Key) -> String {
    match key {
        Key::Scalar(cell) => cell.to_string(),
        Key::Composite(cells) => {
            JsonValue::Array(cells.iter().map(cell_to_json).collect()).to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// Text outline
// ---------------------------------------------------------------------------

/// Render a tree as an indented outline, two spaces per level.
pub fn to_text(node: &ResultNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out
}

fn write_node(out: &mut String, node: &ResultNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        ResultNode::Branch(entries) => {
            for (key, child) in entries {
                let _ = writeln!(out, "{indent}{key}");
                write_node(out, child, depth + 1);
            }
        }
        ResultNode::Leaf(items) => {
            for item in items {
                match item {
                    LeafItem::Value(cell) => {
                        let _ = writeln!(out, "{indent}- {cell}");
                    }
                    LeafItem::Record(cells) => {
                        let fields: Vec<String> = cells.iter().map(Cell::to_string).collect();
                        let _ = writeln!(out, "{indent}- [{}]", fields.join(", "));
                    }
                }
            }
        }
    }
}

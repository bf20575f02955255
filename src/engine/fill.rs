//! Merged-cell reconstruction.
//!
//! Spreadsheet exports of merged cells leave every row but the first of a
//! merged block blank. A blank under a key column is a continuation of the
//! block above, unless a more significant key column starts a new value on the
//! same row: then the blank is a deliberate omission and stays null.

use log::trace;

use crate::data::model::{Cell, Row};

/// Resolve blanks (`None`) in `rows`.
///
/// `significant` lists the key columns from most to least significant. Blanks
/// outside that list resolve to `Cell::Null` without inheritance.
pub fn forward_fill(rows: Vec<Vec<Option<Cell>>>, significant: &[usize]) -> Vec<Row> {
    // Last explicit value per significance rank; `None` once a more significant
    // column has started a new block.
    let mut carry: Vec<Option<Cell>> = vec![None; significant.len()];

    rows.into_iter()
        .enumerate()
        .map(|(row_idx, mut row)| {
            for (rank, &col) in significant.iter().enumerate() {
                let Some(slot) = row.get_mut(col) else {
                    continue;
                };
                if let Some(value) = slot {
                    if !value.is_null() {
                        carry[rank] = Some(value.clone());
                        carry[rank + 1..].fill(None);
                    }
                } else if let Some(inherited) = &carry[rank] {
                    *slot = Some(inherited.clone());
                } else {
                    trace!("row {row_idx}: column {col} has nothing to inherit");
                }
            }
            row.into_iter().map(|c| c.unwrap_or(Cell::Null)).collect()
        })
        .collect()
}

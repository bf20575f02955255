//! Fold spreadsheet rows into nested structures described by a column template.
//!
//! ```text
//! Report1  SectionA  Value1          {"Report1": [["SectionA", "Value1"],
//!          SectionB  Value2    ──▶                ["SectionB", "Value2"]],
//! Report2  SectionC  N/A              "Report2": [["SectionC", null]]}
//! ```
//!
//! The template `[[_],[_,_]]` above turns column 0 into keys and columns 1-2
//! into leaf records; the blank under `Report1` is filled from the merged cell.

pub mod config;
pub mod data;
pub mod engine;
pub mod export;

pub use data::model::{Cell, Row, Sheet};
pub use data::nulls::NullTokens;
pub use engine::{extract, ExtractError, Extractor, Key, LeafItem, ResultNode, Template};

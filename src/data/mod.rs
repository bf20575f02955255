/// Data layer: cell model, null tokens, and loading.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet / .xlsx
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, skip leading rows → Sheet
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Sheet    │  headers + Vec<Row> of Cell
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  nulls    │  token table consumed by the engine
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod nulls;

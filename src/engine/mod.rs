/// Extraction engine: null normalization, merged-cell fill, template folding.
///
/// Architecture:
/// ```text
///   Sheet (headers + raw cells)
///        │
///        ▼
///   ┌──────────────┐
///   │  NullTokens   │  classify each cell: blank / explicit null / value
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  fill         │  resolve blanks in key columns, block by block
///   └──────────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │  group        │  fold rows into Branch / Leaf nodes per template group
///   └──────────────┘
///        │
///        ▼
///   ResultNode
/// ```

pub mod error;
pub mod extract;
pub mod fill;
pub mod group;
pub mod template;

pub use error::{ExtractError, TemplateParseError};
pub use extract::{extract, Extractor};
pub use group::{Key, LeafItem, ResultNode};
pub use template::Template;

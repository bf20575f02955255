use std::collections::BTreeSet;

use super::model::Cell;

// ---------------------------------------------------------------------------
// Null-token table
// ---------------------------------------------------------------------------

/// Spellings treated as null by default (compared trimmed and lower-cased).
pub const DEFAULT_NULL_TOKENS: &[&str] = &[
    "",
    " ",
    "nan",
    "na",
    "n/a",
    "null",
    "#n/a",
    "#n/a n/a",
    "#na",
    "-nan",
    "-1.#ind",
    "-1.#qnan",
    "1.#ind",
    "1.#qnan",
    "<na>",
    "none",
    "nan%",
    "nat",
];

/// The set of strings recognized as null, passed explicitly to every
/// extraction call instead of living in a process-wide table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullTokens {
    tokens: BTreeSet<String>,
}

impl Default for NullTokens {
    fn default() -> Self {
        NullTokens::new(DEFAULT_NULL_TOKENS.iter().copied())
    }
}

impl NullTokens {
    /// Build a table from arbitrary spellings; they are stored trimmed and lower-cased.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        NullTokens {
            tokens: tokens.into_iter().map(|t| fold(t.as_ref())).collect(),
        }
    }

    /// The default table extended with `extra` spellings.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = NullTokens::default();
        table
            .tokens
            .extend(extra.into_iter().map(|t| fold(t.as_ref())));
        table
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(&fold(token))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Map null-like cells to `Cell::Null`; every other cell passes through unchanged.
    pub fn normalize(&self, cell: &Cell) -> Cell {
        if self.is_null_like(cell) {
            Cell::Null
        } else {
            cell.clone()
        }
    }

    /// Normalize a raw cell while keeping blanks apart from explicit null tokens.
    ///
    /// * `None`             – blank (absent or whitespace-only); may inherit during fill
    /// * `Some(Cell::Null)` – an explicit null spelling; never inherits
    /// * `Some(v)`          – an explicit value
    pub fn classify(&self, cell: &Cell) -> Option<Cell> {
        match cell {
            Cell::Null => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            other => Some(self.normalize(other)),
        }
    }

    /// Null, NaN, or a cell whose string form is a configured token.
    fn is_null_like(&self, cell: &Cell) -> bool {
        match cell {
            Cell::Null => true,
            Cell::Float(f) if f.is_nan() => true,
            Cell::Text(s) | Cell::Date(s) => self.tokens.contains(&fold(s)),
            other => self.tokens.contains(&fold(&other.to_string())),
        }
    }
}

fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

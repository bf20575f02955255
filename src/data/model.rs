use std::fmt;

// ---------------------------------------------------------------------------
// Cell – a single value of the loaded matrix
// ---------------------------------------------------------------------------

/// Integral floats at or above this magnitude stay floats (no exact i64 form).
const INTEGRAL_FLOAT_LIMIT: f64 = 1e15;

/// A dynamically-typed cell value as delivered by a spreadsheet or CSV loader.
/// Cells are used as grouping keys downstream, so `Cell` must be `Eq + Hash + Ord`.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date or date-time kept in its textual (ISO-8601 where available) form.
    Date(String),
    /// The canonical empty value.
    Null,
}

// -- Manual Eq/Ord/Hash so Cell can key maps and sets; floats compare by total order --

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Cell::*;
        fn discriminant(v: &Cell) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Int(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Text(s) | Cell::Date(s) => s.hash(state),
            Cell::Int(i) => i.hash(state),
            Cell::Float(f) => f.to_bits().hash(state),
            Cell::Bool(b) => b.hash(state),
            Cell::Null => {}
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Date(d) => write!(f, "{d}"),
            Cell::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Null, Into::into)
    }
}

impl Cell {
    /// Build a numeric cell, collapsing integral floats into `Int` so that `1.0`
    /// read from a workbook groups together with `1` read from CSV.
    pub fn from_f64(v: f64) -> Self {
        if v.is_finite() && v.fract() == 0.0 && v.abs() < INTEGRAL_FLOAT_LIMIT {
            Cell::Int(v as i64)
        } else {
            Cell::Float(v)
        }
    }

    /// Type a raw text field: integers, then floats, otherwise trimmed text.
    /// Empty text is `Null`.
    pub fn guess(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return Cell::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return Cell::Int(i);
        }
        // "nan"/"inf" parse as floats; leave them as text for the null normalizer.
        if s.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(f) = s.parse::<f64>() {
                return Cell::from_f64(f);
            }
        }
        Cell::Text(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Text-like view used for token comparison.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) | Cell::Date(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sheet – the complete loaded matrix
// ---------------------------------------------------------------------------

/// One row of the matrix.
pub type Row = Vec<Cell>;

/// A fully materialized matrix: ordered headers plus row-major cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    /// Column headers; their count is the declared width of every row.
    pub headers: Vec<String>,
    /// All rows, header rows already removed.
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Sheet { headers, rows }
    }

    /// Build a sheet without named columns; headers become `0`, `1`, ...
    /// and the first row declares the width.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        Sheet {
            headers: positional_headers(width),
            rows,
        }
    }

    /// Declared column count.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the sheet has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Headers `0..width` for sources that carry no header row.
pub fn positional_headers(width: usize) -> Vec<String> {
    (0..width).map(|i| i.to_string()).collect()
}

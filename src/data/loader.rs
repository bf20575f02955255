use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, DataType as _, Range, Reader};
use log::{info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{positional_headers, Cell, Row, Sheet};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How a file becomes a [`Sheet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Leading rows discarded before the header (if any) and data.
    pub skip_rows: usize,
    /// Treat the first row left after skipping as column headers.
    pub has_header: bool,
    /// Worksheet to read from a workbook; the first sheet when absent.
    pub sheet: Option<String>,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a matrix from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`                  – plain rows; empty fields are blanks
/// * `.json`                 – `[[...], ...]` rows or `[{...}, ...]` records
/// * `.parquet`              – scalar columns; names become headers
/// * `.xlsx` / `.xls` / `.ods` – one worksheet, in sheet coordinates
pub fn load_file(path: &Path, opts: &LoadOptions) -> Result<Sheet> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let sheet = match ext.as_str() {
        "csv" => load_csv(path, opts),
        "json" => load_json(path, opts),
        "parquet" | "pq" => load_parquet(path, opts),
        "xlsx" | "xlsm" | "xls" | "ods" => load_workbook(path, opts),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    info!(
        "loaded {} rows x {} columns from {}",
        sheet.len(),
        sheet.width(),
        path.display()
    );
    Ok(sheet)
}

/// Apply `skip_rows` and `has_header` to rows read in file order.
fn assemble(mut rows: Vec<Row>, opts: &LoadOptions) -> Sheet {
    skip_leading(&mut rows, opts.skip_rows);
    if opts.has_header && !rows.is_empty() {
        let header_row = rows.remove(0);
        let headers = header_row
            .iter()
            .map(|c| if c.is_null() { String::new() } else { c.to_string() })
            .collect();
        return Sheet::new(headers, rows);
    }
    Sheet::from_rows(rows)
}

fn skip_leading(rows: &mut Vec<Row>, n: usize) {
    if n > rows.len() {
        warn!("skip_rows={n} exceeds the {} rows present", rows.len());
    }
    let skipped = n.min(rows.len());
    if skipped > 0 {
        info!("skipped {skipped} leading rows");
    }
    rows.drain(..skipped);
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: no header unless `has_header`. Rows may be ragged; the engine
/// reports rows whose width differs from the first.
fn load_csv(path: &Path, opts: &LoadOptions) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(Cell::guess).collect());
    }
    if rows.is_empty() {
        warn!("{} contains no rows", path.display());
    }

    Ok(assemble(rows, opts))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Accepted JSON layouts:
///
/// ```json
/// [["Report1", "SectionA", 5000000], [null, "SectionB", 6200000]]
/// ```
///
/// or records-oriented (`df.to_json(orient='records')`), where keys become
/// headers in first-seen order and missing keys are blanks:
///
/// ```json
/// [{"report": "Report1", "amount": 5000000}, {"amount": 6200000}]
/// ```
fn load_json(path: &Path, opts: &LoadOptions) -> Result<Sheet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    if records.iter().all(JsonValue::is_array) {
        let rows = records
            .iter()
            .filter_map(JsonValue::as_array)
            .map(|arr| arr.iter().map(json_to_cell).collect())
            .collect();
        return Ok(assemble(rows, opts));
    }

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is neither a JSON array nor an object"))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut rows: Vec<Row> = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map_or(Cell::Null, json_to_cell))
                .collect()
        })
        .collect();
    skip_leading(&mut rows, opts.skip_rows);

    Ok(Sheet::new(headers, rows))
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Int(i)
            } else if let Some(f) = n.as_f64() {
                Cell::from_f64(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of scalar columns.
///
/// Column names become headers; `skip_rows` drops leading data rows. Works
/// with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path, opts: &LoadOptions) -> Result<Sheet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Row> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .enumerate()
                .map(|(col, array)| {
                    arrow_cell(array, row)
                        .with_context(|| format!("Row {row}, column '{}'", headers[col]))
                })
                .collect::<Result<Row>>()?;
            rows.push(cells);
        }
    }
    skip_leading(&mut rows, opts.skip_rows);

    Ok(Sheet::new(headers, rows))
}

// -- Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &Arc<dyn Array>, row: usize) -> Result<Cell> {
    if col.is_null(row) {
        return Ok(Cell::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => {
            let arr = downcast::<Int32Array>(col)?;
            Cell::Int(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = downcast::<Int64Array>(col)?;
            Cell::Int(arr.value(row))
        }
        DataType::Float32 => {
            let arr = downcast::<Float32Array>(col)?;
            Cell::from_f64(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = downcast::<Float64Array>(col)?;
            Cell::from_f64(arr.value(row))
        }
        DataType::Boolean => {
            let arr = downcast::<BooleanArray>(col)?;
            Cell::Bool(arr.value(row))
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            Cell::Date(array_value_to_string(col.as_ref(), row)?)
        }
        _ => Cell::guess(&array_value_to_string(col.as_ref(), row)?),
    };
    Ok(cell)
}

fn downcast<T: Array + 'static>(col: &Arc<dyn Array>) -> Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array layout for {:?}", col.data_type()))
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// Load one worksheet. Cell positions follow sheet coordinates, so leading
/// empty rows count towards `skip_rows` and leading empty columns are kept.
fn load_workbook(path: &Path, opts: &LoadOptions) -> Result<Sheet> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;

    let name = match &opts.sheet {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .context("workbook has no sheets")?,
    };
    let range = workbook
        .worksheet_range(&name)
        .with_context(|| format!("reading sheet '{name}'"))?;
    info!("reading sheet '{name}'");

    Ok(assemble(range_to_rows(&range), opts))
}

fn range_to_rows(range: &Range<Data>) -> Vec<Row> {
    let Some((first_row, first_col)) = range.start() else {
        return Vec::new();
    };
    let width = first_col as usize + range.width();

    let mut rows: Vec<Row> = vec![vec![Cell::Null; width]; first_row as usize];
    for data_row in range.rows() {
        let mut row = vec![Cell::Null; first_col as usize];
        row.extend(data_row.iter().map(workbook_cell));
        rows.push(row);
    }
    // Rows made of nothing but sheet padding give the engine nothing to fold.
    if !rows.is_empty() && rows.iter().all(|r| r.iter().all(Cell::is_null)) {
        return Vec::new();
    }
    rows
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::from_f64(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) => Cell::guess(s),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Date(s.clone()),
        // #N/A, #DIV/0! and friends carry no value.
        Data::Error(_) => Cell::Null,
        other => match other.as_datetime() {
            Some(dt) => Cell::Date(dt.to_string()),
            None => Cell::Text(other.to_string()),
        },
    }
}

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// One exported row of a merged-cell report: blanks are the cells covered by
/// a merge above them.
struct ReportRow {
    report: Option<&'static str>,
    section: Option<&'static str>,
    value: Option<&'static str>,
    year: i64,
    quarter: &'static str,
    amount: i64,
}

const HEADERS: [&str; 6] = ["report", "section", "value", "year", "quarter", "amount"];

fn report_rows() -> Vec<ReportRow> {
    let row = |report, section, value, year, quarter, amount| ReportRow {
        report,
        section,
        value,
        year,
        quarter,
        amount,
    };
    vec![
        row(Some("Report1"), Some("SectionA"), Some("Value1"), 2023, "Q1", 5_000_000),
        row(None, None, None, 2023, "Q2", 6_200_000),
        row(None, Some("SectionB"), Some("Value2"), 2023, "Q1", 5_500_000),
        row(None, None, Some("Value3"), 2024, "Q1", 7_000_000),
        row(None, None, None, 2024, "Q2", 8_000_000),
        row(Some("Report2"), Some("SectionC"), None, 2024, "Q1", 3_000_000),
        row(None, None, Some("Value4"), 2024, "Q2", 3_100_000),
    ]
}

fn write_csv(path: &str, rows: &[ReportRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record(HEADERS)?;
    for r in rows {
        let year = r.year.to_string();
        let amount = r.amount.to_string();
        writer.write_record([
            r.report.unwrap_or(""),
            r.section.unwrap_or(""),
            r.value.unwrap_or(""),
            year.as_str(),
            r.quarter,
            amount.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn text_column(rows: &[ReportRow], f: impl Fn(&ReportRow) -> Option<&'static str>) -> ArrayRef {
    Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
}

fn int_column(rows: &[ReportRow], f: impl Fn(&ReportRow) -> i64) -> ArrayRef {
    Arc::new(Int64Array::from_iter_values(rows.iter().map(f)))
}

fn write_parquet(path: &str, rows: &[ReportRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Utf8, true),
        Field::new(HEADERS[1], DataType::Utf8, true),
        Field::new(HEADERS[2], DataType::Utf8, true),
        Field::new(HEADERS[3], DataType::Int64, false),
        Field::new(HEADERS[4], DataType::Utf8, false),
        Field::new(HEADERS[5], DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text_column(rows, |r| r.report),
            text_column(rows, |r| r.section),
            text_column(rows, |r| r.value),
            int_column(rows, |r| r.year),
            text_column(rows, |r| Some(r.quarter)),
            int_column(rows, |r| r.amount),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let rows = report_rows();
    write_csv("sample_report.csv", &rows)?;
    write_parquet("sample_report.parquet", &rows)?;

    println!(
        "Wrote {} rows to sample_report.csv and sample_report.parquet; try\n  \
         tabfold sample_report.csv --header --template \"[[_],[_],[_],[_,_],[_]]\"",
        rows.len()
    );
    Ok(())
}

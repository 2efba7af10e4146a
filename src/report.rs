use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{CorrelationMatrix, SheetProfile, HEAD_ROWS};
use crate::services::analysis::{column_totals, frequency_table};
use crate::services::sheets::{months, CleanSheet};

const RULE_WIDTH: usize = 66;

/// Per-sheet console report: shape, head, column types, numeric and
/// categorical exploration, month totals where applicable, and the
/// correlation matrix.
pub fn print_sheet_report(
    sheet: &CleanSheet,
    profile: &SheetProfile,
    config: &Config,
) -> Result<(), AppError> {
    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("Sheet: {}  (source: {:?})", profile.sheet, profile.source_sheet);
    println!("{}", "=".repeat(RULE_WIDTH));
    println!(
        "Rows: {}   Columns: {}   Long-form rows: {}",
        profile.row_count, profile.column_count, profile.long_row_count
    );

    println!("\nFirst rows:");
    println!("{}", sheet.wide.head(Some(HEAD_ROWS)));

    println!("Column types:");
    for column in &profile.columns {
        println!(
            "  {:<24} {:<10} ({} nulls)",
            column.name, column.dtype, column.null_count
        );
    }

    println!("\nNumeric variables:");
    let mut any_numeric = false;
    for column in &profile.columns {
        if let Some(stats) = &column.numeric {
            any_numeric = true;
            println!(
                "  {:<24} count={:<5} mean={:<10} median={:<10} std={:<10} min={:<10} max={}",
                column.name,
                stats.count,
                fmt_stat(stats.mean),
                fmt_stat(stats.median),
                fmt_stat(stats.std_dev),
                fmt_stat(stats.min),
                fmt_stat(stats.max),
            );
        }
    }
    if !any_numeric {
        println!("  (none)");
    }

    println!("\nCategorical variables:");
    let mut any_categorical = false;
    for column in &profile.columns {
        if let Some(stats) = &column.categorical {
            any_categorical = true;
            println!(
                "  {:<24} count={:<5} unique={:<5} top={:?} ({})",
                column.name,
                stats.count,
                stats.unique,
                stats.top.as_deref().unwrap_or("-"),
                stats.top_count
            );
            let freq = frequency_table(&sheet.wide, &column.name, Some(config.top_n))?;
            println!("{freq}");
        }
    }
    if !any_categorical {
        println!("  (none)");
    }

    if sheet.kind.has_month_columns() {
        let mut totals = column_totals(sheet)?;
        months::sort_by_month(&mut totals);
        println!("\nTotals by month:");
        for (label, total) in &totals {
            println!("  {:<14} {:>10.0}", label, total);
        }
    }

    match &profile.correlation {
        Some(matrix) => {
            println!("\nCorrelation matrix:");
            println!("{}", correlation_frame(matrix)?);
        }
        None => println!("\nNot enough numeric variables to compute a correlation matrix."),
    }

    println!("\nLong form sample:");
    println!("{}", sheet.long.head(Some(HEAD_ROWS)));

    Ok(())
}

fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

/// Correlation matrix as a DataFrame so the console rendering matches the
/// other tables.
fn correlation_frame(matrix: &CorrelationMatrix) -> Result<DataFrame, AppError> {
    let mut columns = vec![Series::new("variable", matrix.columns.clone())];
    for (j, name) in matrix.columns.iter().enumerate() {
        let column: Vec<f64> = matrix.values.iter().map(|row| row[j]).collect();
        columns.push(Series::new(name.as_str(), column));
    }
    Ok(DataFrame::new(columns)?)
}

pub fn write_json(profiles: &[SheetProfile], path: &Path) -> Result<(), AppError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), profiles)?;
    Ok(())
}

/// Long-form CSV export, one file per sheet.
pub fn write_long_csv(sheet: &CleanSheet, dir: &Path) -> Result<PathBuf, AppError> {
    let path = dir.join(format!("{}_long.csv", sheet.kind.key()));
    let mut file = File::create(&path)?;
    let mut long = sheet.long.clone();
    CsvWriter::new(&mut file).finish(&mut long)?;
    Ok(path)
}

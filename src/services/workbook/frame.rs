use std::collections::HashSet;

use calamine::Data;
use polars::prelude::*;

use super::utils::{
    clean_column_name, detect_column_type, parse_date_text, parse_numeric_text, ColumnType,
};
use crate::error::AppError;

/// Days between the Excel serial-date epoch (1899-12-30) and the Unix epoch.
const EXCEL_EPOCH_OFFSET_DAYS: f64 = 25_569.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Build a DataFrame from a worksheet's cell rows.
///
/// The first row is taken as the header and cleaned into unique snake_case
/// names; every other row becomes an observation. Each column is typed from
/// its cells (numeric, date or text) and fully-empty rows and columns are
/// dropped afterwards.
pub fn frame_from_rows(rows: &[Vec<Data>]) -> Result<DataFrame, AppError> {
    let Some(header_row) = rows.first() else {
        return Err(AppError::Parse("worksheet has no rows".to_string()));
    };

    let mut existing_names = HashSet::new();
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| clean_column_name(&cell.to_string(), &mut existing_names))
        .collect();

    let mut columns = Vec::with_capacity(headers.len());
    for (col_idx, header) in headers.iter().enumerate() {
        let values: Vec<Data> = rows
            .iter()
            .skip(1)
            .map(|row| row.get(col_idx).cloned().unwrap_or(Data::Empty))
            .collect();

        let series = match detect_column_type(&values) {
            ColumnType::Numeric => {
                let nums: Vec<Option<f64>> = values.iter().map(cell_to_f64).collect();
                Series::new(header, nums)
            }
            ColumnType::Date => {
                let stamps: Vec<Option<i64>> = values.iter().map(cell_to_timestamp_ms).collect();
                Series::new(header, stamps)
                    .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
            }
            ColumnType::Text => {
                let strings: Vec<Option<String>> = values
                    .iter()
                    .map(|v| match v {
                        Data::Empty => None,
                        other => Some(other.to_string()),
                    })
                    .collect();
                Series::new(header, strings)
            }
        };
        columns.push(series);
    }

    drop_empty(DataFrame::new(columns)?)
}

fn cell_to_f64(value: &Data) -> Option<f64> {
    match value {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_numeric_text(s),
        _ => None,
    }
}

fn cell_to_timestamp_ms(value: &Data) -> Option<i64> {
    match value {
        Data::DateTime(d) => Some(((d.as_f64() - EXCEL_EPOCH_OFFSET_DAYS) * MS_PER_DAY) as i64),
        Data::String(s) => parse_date_text(s.trim()).map(|dt| dt.and_utc().timestamp_millis()),
        _ => None,
    }
}

/// Drop columns and rows that carry no values at all.
fn drop_empty(df: DataFrame) -> Result<DataFrame, AppError> {
    let keep: Vec<&str> = df
        .get_columns()
        .iter()
        .filter(|series| series.null_count() < series.len())
        .map(|series| series.name())
        .collect();
    let pruned = df.select(keep)?;

    if pruned.width() == 0 || pruned.height() == 0 {
        return Ok(pruned);
    }

    let mut row_has_value = vec![false; pruned.height()];
    for series in pruned.get_columns() {
        for (idx, valid) in series.is_not_null().into_iter().enumerate() {
            if valid.unwrap_or(false) {
                row_has_value[idx] = true;
            }
        }
    }
    let mask = Series::new("row_has_value", row_has_value);
    Ok(pruned.filter(mask.bool()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_rows() -> Vec<Vec<Data>> {
        vec![
            vec![
                Data::String("Departamento".into()),
                Data::String("Enero".into()),
                Data::String("Febrero".into()),
                Data::Empty,
            ],
            vec![
                Data::String("Guatemala".into()),
                Data::Int(120),
                Data::Float(95.0),
                Data::Empty,
            ],
            vec![
                Data::String("Sacatepéquez".into()),
                Data::String("1,204".into()),
                Data::Int(7),
                Data::Empty,
            ],
            vec![Data::Empty, Data::Empty, Data::Empty, Data::Empty],
        ]
    }

    #[test]
    fn builds_typed_frame_from_rows() {
        let df = frame_from_rows(&sheet_rows()).unwrap();

        // The empty column and the empty trailing row are gone.
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.get_column_names(), &["departamento", "enero", "febrero"]);

        assert_eq!(df.column("departamento").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("enero").unwrap().dtype(), &DataType::Float64);

        // Thousands separator in a text cell still lands as a number.
        let enero = df.column("enero").unwrap().f64().unwrap();
        assert_eq!(enero.get(1), Some(1204.0));
    }

    #[test]
    fn reported_shape_matches_frame() {
        let df = frame_from_rows(&sheet_rows()).unwrap();
        assert_eq!((df.height(), df.width()), df.shape());
    }

    #[test]
    fn empty_sheet_is_an_error() {
        assert!(matches!(
            frame_from_rows(&[]),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn header_only_sheet_yields_empty_frame() {
        let rows = vec![vec![Data::String("a".into()), Data::String("b".into())]];
        let df = frame_from_rows(&rows).unwrap();
        assert_eq!(df.height(), 0);
    }
}

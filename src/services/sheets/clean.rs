use polars::prelude::*;

use super::kind::SheetKind;
use crate::error::AppError;
use crate::services::workbook::utils::is_total_label;

/// One workbook sheet after cleaning, in both shapes the analysis needs.
#[derive(Debug, Clone)]
pub struct CleanSheet {
    pub kind: SheetKind,
    /// Worksheet name this came from.
    pub source_sheet: String,
    /// One row per label, one column per category.
    pub wide: DataFrame,
    /// One row per label/category pair.
    pub long: DataFrame,
}

impl CleanSheet {
    /// Value column names of the wide frame, in spreadsheet order.
    pub fn value_columns(&self) -> Vec<String> {
        let id = self.kind.id_column();
        self.wide
            .get_column_names()
            .iter()
            .filter(|name| *name != &id)
            .map(|name| name.to_string())
            .collect()
    }
}

/// Clean a freshly materialized sheet and reshape it to long form.
///
/// Cleaning renames the leading label column to the sheet's canonical id,
/// drops aggregate rows and the aggregate `total` column, and casts every
/// remaining category column to counts. The reshape melts the category
/// columns into `(id, category, divorces)` rows.
pub fn clean(kind: SheetKind, frame: DataFrame, source_sheet: &str) -> Result<CleanSheet, AppError> {
    let mut wide = frame;

    let Some(first) = wide.get_column_names().first().map(|s| s.to_string()) else {
        return Err(AppError::Parse(format!("sheet {kind} is empty after load")));
    };
    wide.rename(&first, kind.id_column())?;

    wide = drop_total_column(wide)?;
    wide = drop_aggregate_rows(wide, kind.id_column())?;

    let value_columns: Vec<String> = wide
        .get_column_names()
        .iter()
        .filter(|name| *name != &kind.id_column())
        .map(|name| name.to_string())
        .collect();
    if value_columns.is_empty() {
        return Err(AppError::Parse(format!(
            "sheet {kind} has no category columns to analyze"
        )));
    }

    for name in &value_columns {
        let casted = wide.column(name)?.cast(&DataType::Float64)?;
        wide.replace(name, casted)?;
    }

    let long = melt_wide(&wide, kind, &value_columns)?;

    tracing::debug!(
        sheet = %kind,
        wide_rows = wide.height(),
        categories = value_columns.len(),
        long_rows = long.height(),
        "cleaned and reshaped sheet"
    );

    Ok(CleanSheet {
        kind,
        source_sheet: source_sheet.to_string(),
        wide,
        long,
    })
}

fn drop_total_column(df: DataFrame) -> Result<DataFrame, AppError> {
    match df.get_column_names().iter().find(|name| is_total_label(name)) {
        Some(name) => {
            let name = name.to_string();
            Ok(df.drop(&name)?)
        }
        None => Ok(df),
    }
}

/// Drop rows whose label is an aggregate ("Total", "República ...") or
/// missing entirely. Non-string labels (the day-number column of the
/// occurrence sheet) only need the null check: their aggregate row has a
/// textual label that did not survive the numeric cast.
fn drop_aggregate_rows(df: DataFrame, id_column: &str) -> Result<DataFrame, AppError> {
    let id = df.column(id_column)?;
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let keep_row = match id.get(idx)? {
            AnyValue::Null => false,
            AnyValue::String(label) => !is_total_label(label),
            _ => true,
        };
        keep.push(keep_row);
    }
    let mask = Series::new("keep", keep);
    Ok(df.filter(mask.bool()?)?)
}

fn melt_wide(
    wide: &DataFrame,
    kind: SheetKind,
    value_columns: &[String],
) -> Result<DataFrame, AppError> {
    let args = MeltArgs {
        id_vars: vec![kind.id_column().into()],
        value_vars: value_columns.iter().map(|name| name.as_str().into()).collect(),
        variable_name: Some(kind.variable_column().into()),
        value_name: Some(kind.value_column().into()),
        streamable: false,
    };
    Ok(wide.melt2(args)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn registration_frame() -> DataFrame {
        df!(
            "departamento" => &[
                Some("Total"),
                Some("Guatemala"),
                Some("Sacatepéquez"),
                None,
            ],
            "total" => &[300.0, 200.0, 100.0, 0.0],
            "enero" => &[150.0, 100.0, 50.0, 0.0],
            "febrero" => &[150.0, 100.0, 50.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn cleaning_drops_aggregates_and_renames_id() {
        let sheet = clean(SheetKind::Registration, registration_frame(), "Cuadro 3").unwrap();

        assert_eq!(
            sheet.wide.get_column_names(),
            &["department", "enero", "febrero"]
        );
        assert_eq!(sheet.wide.height(), 2);

        let departments = sheet.wide.column("department").unwrap();
        let labels: Vec<String> = (0..departments.len())
            .map(|i| departments.get(i).unwrap().to_string())
            .collect();
        assert!(!labels.iter().any(|l| l.contains("Total")));
    }

    #[test]
    fn melt_multiplies_rows_by_category_count() {
        let sheet = clean(SheetKind::Registration, registration_frame(), "Cuadro 3").unwrap();

        let categories = sheet.value_columns().len();
        assert_eq!(categories, 2);
        assert_eq!(sheet.long.height(), sheet.wide.height() * categories);
        assert_eq!(
            sheet.long.get_column_names(),
            &["department", "month", "divorces"]
        );
    }

    #[test]
    fn counts_become_floats() {
        let frame = df!(
            "ocupacion" => &["Agricultores", "Comerciantes"],
            "hombres" => &[12i64, 30],
            "mujeres" => &[3i64, 41],
        )
        .unwrap();
        let sheet = clean(SheetKind::Occupations, frame, "Cuadro 4").unwrap();

        assert_eq!(
            sheet.wide.column("hombres").unwrap().dtype(),
            &DataType::Float64
        );
        assert_eq!(
            sheet.long.get_column_names(),
            &["occupation", "spouse", "divorces"]
        );
        let total: f64 = sheet
            .long
            .column("divorces")
            .unwrap()
            .f64()
            .unwrap()
            .sum()
            .unwrap_or(0.0);
        assert_eq!(total, 86.0);
    }

    #[test]
    fn sheet_without_categories_is_rejected() {
        let frame = df!("departamento" => &["Guatemala"]).unwrap();
        assert!(matches!(
            clean(SheetKind::Registration, frame, "Cuadro 3"),
            Err(AppError::Parse(_))
        ));
    }
}

use polars::prelude::*;

use crate::error::AppError;
use crate::services::sheets::CleanSheet;

/// Sum of the value column per category of `by`, descending by total
/// (ties break on the label). Works on the long frame.
pub fn grouped_totals(
    long: &DataFrame,
    by: &str,
    value: &str,
) -> Result<Vec<(String, f64)>, AppError> {
    for name in [by, value] {
        if long.column(name).is_err() {
            return Err(AppError::MissingColumn(name.to_string()));
        }
    }

    let grouped = long
        .clone()
        .lazy()
        .drop_nulls(Some(vec![col(by), col(value)]))
        .group_by([col(by)])
        .agg([col(value).sum().alias("total")])
        .collect()?;

    let labels = grouped.column(by)?.cast(&DataType::String)?;
    let labels = labels.str()?;
    let totals = grouped.column("total")?.f64()?;

    let mut entries: Vec<(String, f64)> = labels
        .into_iter()
        .zip(totals.into_iter())
        .filter_map(|(label, total)| Some((label?.to_string(), total?)))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    Ok(entries)
}

/// Per-category totals of the wide frame, in spreadsheet column order.
/// Used where the source ordering is meaningful (age bands, month columns
/// before the calendar reorder).
pub fn column_totals(sheet: &CleanSheet) -> Result<Vec<(String, f64)>, AppError> {
    let mut entries = Vec::new();
    for name in sheet.value_columns() {
        let total = sheet
            .wide
            .column(&name)?
            .f64()?
            .sum()
            .unwrap_or(0.0);
        entries.push((name, total));
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sheets::{clean, months, SheetKind};
    use polars::df;

    fn occupation_sheet() -> CleanSheet {
        let frame = df!(
            "ocupacion" => &["Agricultores", "Comerciantes", "Docentes"],
            "hombres" => &[40.0, 10.0, 5.0],
            "mujeres" => &[2.0, 12.0, 25.0],
        )
        .unwrap();
        clean(SheetKind::Occupations, frame, "Cuadro 4").unwrap()
    }

    #[test]
    fn grouped_totals_sum_and_rank() {
        let sheet = occupation_sheet();
        let totals = grouped_totals(&sheet.long, "occupation", "divorces").unwrap();

        assert_eq!(
            totals,
            vec![
                ("Agricultores".to_string(), 42.0),
                ("Docentes".to_string(), 30.0),
                ("Comerciantes".to_string(), 22.0),
            ]
        );
    }

    #[test]
    fn column_totals_keep_spreadsheet_order() {
        let sheet = occupation_sheet();
        let totals = column_totals(&sheet).unwrap();

        assert_eq!(
            totals,
            vec![("hombres".to_string(), 55.0), ("mujeres".to_string(), 39.0)]
        );
    }

    #[test]
    fn month_totals_follow_calendar_order() {
        let frame = df!(
            "departamento" => &["Guatemala", "Petén"],
            "marzo" => &[3.0, 1.0],
            "enero" => &[2.0, 2.0],
            "febrero" => &[1.0, 1.0],
        )
        .unwrap();
        let sheet = clean(SheetKind::Registration, frame, "Cuadro 3").unwrap();

        let mut totals = column_totals(&sheet).unwrap();
        months::sort_by_month(&mut totals);

        let labels: Vec<&str> = totals.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["enero", "febrero", "marzo"]);
        assert_eq!(totals[0].1, 4.0);
    }
}

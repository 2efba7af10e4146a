mod bar;
mod heatmap;
mod palette;

use std::fs;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::AppError;
use crate::services::analysis::{column_totals, grouped_totals};
use crate::services::sheets::{months, CleanSheet, SheetKind};

pub use bar::{horizontal_bars, vertical_bars};
pub use heatmap::heatmap;
pub use palette::{generate_palette, heat_color};

/// Render the fixed chart set into `config.out_dir`, one SVG per sheet.
/// Sheets with nothing to draw are skipped with a warning.
pub fn render_all(sheets: &[CleanSheet], config: &Config) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(&config.out_dir)?;

    let mut written = Vec::new();
    for sheet in sheets {
        match render_sheet(sheet, config)? {
            Some(path) => {
                tracing::info!(chart = %path.display(), "wrote chart");
                written.push(path);
            }
            None => tracing::warn!(sheet = %sheet.kind, "no data to chart, skipping"),
        }
    }
    Ok(written)
}

fn render_sheet(sheet: &CleanSheet, config: &Config) -> Result<Option<PathBuf>, AppError> {
    let svg = match sheet.kind {
        SheetKind::AgeGroups => {
            // Age bands keep their spreadsheet order.
            let data = labelled(column_totals(sheet)?);
            if data.is_empty() {
                return Ok(None);
            }
            vertical_bars("Divorces by age group", "divorces", &data)?
        }
        SheetKind::Occurrence => {
            let mut data = column_totals(sheet)?;
            months::sort_by_month(&mut data);
            let data = labelled(data);
            if data.is_empty() {
                return Ok(None);
            }
            vertical_bars("Divorces by month of occurrence", "divorces", &data)?
        }
        SheetKind::EthnicOrigin => {
            let mut data = labelled(column_totals(sheet)?);
            if data.is_empty() {
                return Ok(None);
            }
            // Ascending so the largest group lands on top of the chart.
            data.sort_by(|a, b| a.1.total_cmp(&b.1));
            horizontal_bars("Divorces by ethnic group", "divorces", &data)?
        }
        SheetKind::Occupations => {
            let mut data = grouped_totals(
                &sheet.long,
                sheet.kind.id_column(),
                sheet.kind.value_column(),
            )?;
            data.truncate(config.top_n);
            if data.is_empty() {
                return Ok(None);
            }
            let title = format!("Divorces by occupation (top {})", data.len());
            data.reverse();
            horizontal_bars(&title, "divorces", &data)?
        }
        SheetKind::Registration => {
            let Some(grid) = month_grid(sheet)? else {
                return Ok(None);
            };
            heatmap(
                "Divorces by department and month of registration",
                &grid.x_labels,
                &grid.y_labels,
                &grid.values,
            )?
        }
    };

    let path = config.out_dir.join(format!("{}.svg", chart_file_stem(sheet.kind)));
    fs::write(&path, svg)?;
    Ok(Some(path))
}

fn chart_file_stem(kind: SheetKind) -> &'static str {
    match kind {
        SheetKind::AgeGroups => "age_groups",
        SheetKind::EthnicOrigin => "ethnic_groups",
        SheetKind::Registration => "registration_heatmap",
        SheetKind::Occupations => "occupations",
        SheetKind::Occurrence => "occurrence_months",
    }
}

/// Axis-friendly version of a snake_case column label.
fn prettify(label: &str) -> String {
    label
        .strip_prefix("col_")
        .unwrap_or(label)
        .replace('_', " ")
}

fn labelled(entries: Vec<(String, f64)>) -> Vec<(String, f64)> {
    entries
        .into_iter()
        .map(|(label, value)| (prettify(&label), value))
        .collect()
}

struct MonthGrid {
    x_labels: Vec<String>,
    y_labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

/// Department × month grid for the registration heatmap, with the month
/// columns put back into calendar order.
fn month_grid(sheet: &CleanSheet) -> Result<Option<MonthGrid>, AppError> {
    let mut month_cols: Vec<(String, usize)> = sheet
        .value_columns()
        .into_iter()
        .filter_map(|name| months::month_order(&name).map(|order| (name, order)))
        .collect();
    month_cols.sort_by_key(|(_, order)| *order);

    if month_cols.is_empty() || sheet.wide.height() == 0 {
        return Ok(None);
    }

    let id = sheet.wide.column(sheet.kind.id_column())?;
    let y_labels: Vec<String> = match id.str() {
        Ok(ca) => ca
            .into_iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect(),
        Err(_) => (0..id.len())
            .map(|idx| id.get(idx).map(|v| v.to_string()).unwrap_or_default())
            .collect(),
    };
    let x_labels: Vec<String> = month_cols.iter().map(|(name, _)| prettify(name)).collect();

    let mut values = vec![vec![0.0_f64; month_cols.len()]; y_labels.len()];
    for (col, (name, _)) in month_cols.iter().enumerate() {
        let ca = sheet.wide.column(name)?.f64()?;
        for (row, cell) in values.iter_mut().enumerate() {
            cell[col] = ca.get(row).unwrap_or(0.0);
        }
    }

    Ok(Some(MonthGrid {
        x_labels,
        y_labels,
        values,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sheets::clean;
    use polars::df;
    use polars::prelude::NamedFrom;

    fn registration_sheet() -> CleanSheet {
        let frame = df!(
            "departamento" => &["Guatemala", "Petén"],
            "febrero" => &[5.0, 2.0],
            "enero" => &[3.0, 1.0],
        )
        .unwrap();
        clean(SheetKind::Registration, frame, "Cuadro 3").unwrap()
    }

    #[test]
    fn month_grid_is_calendar_ordered() {
        let grid = month_grid(&registration_sheet()).unwrap().expect("grid");

        assert_eq!(grid.x_labels, ["enero", "febrero"]);
        assert_eq!(grid.y_labels, ["Guatemala", "Petén"]);
        // Values follow the reordered axis.
        assert_eq!(grid.values[0], [3.0, 5.0]);
        assert_eq!(grid.values[1], [1.0, 2.0]);
    }

    #[test]
    fn sheet_without_month_columns_has_no_grid() {
        let frame = df!(
            "departamento" => &["Guatemala"],
            "ignorado" => &[1.0],
        )
        .unwrap();
        let sheet = clean(SheetKind::Registration, frame, "Cuadro 3").unwrap();
        assert!(month_grid(&sheet).unwrap().is_none());
    }

    #[test]
    fn labels_are_prettified() {
        assert_eq!(prettify("col_20_24"), "20 24");
        assert_eq!(prettify("mestizo_ladino"), "mestizo ladino");
    }
}

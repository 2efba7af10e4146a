use polars::prelude::*;
use rayon::prelude::*;
use smallvec::SmallVec;

use super::correlation::correlation_matrix;
use crate::error::AppError;
use crate::models::{CategoricalStats, ColumnProfile, NumericStats, SheetProfile, SAMPLE_SIZE};
use crate::services::sheets::CleanSheet;

/// Descriptive summary of a cleaned sheet: shape, per-column statistics and
/// the correlation matrix over its numeric columns.
pub fn profile_sheet(sheet: &CleanSheet) -> Result<SheetProfile, AppError> {
    let wide = &sheet.wide;
    let columns: Vec<ColumnProfile> = wide.get_columns().par_iter().map(profile_column).collect();
    let correlation = correlation_matrix(wide)?;

    Ok(SheetProfile {
        sheet: sheet.kind.key().to_string(),
        source_sheet: sheet.source_sheet.clone(),
        row_count: wide.height(),
        column_count: wide.width(),
        long_row_count: sheet.long.height(),
        columns,
        correlation,
    })
}

pub(crate) fn profile_column(series: &Series) -> ColumnProfile {
    let null_count = series.null_count();
    let count = series.len() - null_count;

    let mut sample_values = SmallVec::new();
    let as_str = series.str().ok();
    for idx in 0..series.len().min(SAMPLE_SIZE) {
        let rendered = match &as_str {
            Some(ca) => ca.get(idx).unwrap_or_default().to_string(),
            None => match series.get(idx) {
                Ok(AnyValue::Null) | Err(_) => String::new(),
                Ok(value) => value.to_string(),
            },
        };
        sample_values.push(rendered);
    }

    let numeric = if series.dtype().is_numeric() {
        numeric_stats(series, count)
    } else {
        None
    };
    let categorical = if series.dtype() == &DataType::String {
        categorical_stats(series, count)
    } else {
        None
    };

    ColumnProfile {
        name: series.name().to_string(),
        dtype: series.dtype().to_string(),
        null_count,
        sample_values,
        numeric,
        categorical,
    }
}

fn numeric_stats(series: &Series, count: usize) -> Option<NumericStats> {
    let floats = series.cast(&DataType::Float64).ok()?;
    let ca = floats.f64().ok()?;

    Some(NumericStats {
        count,
        mean: ca.mean(),
        median: ca.median(),
        std_dev: ca.std(1),
        min: ca.min(),
        max: ca.max(),
    })
}

fn categorical_stats(series: &Series, count: usize) -> Option<CategoricalStats> {
    let ca = series.str().ok()?;

    let mut counts: std::collections::HashMap<&str, usize> = std::collections::HashMap::new();
    for value in ca.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }
    let unique = counts.len();

    // Most frequent value; ties go to the lexicographically smallest label.
    let top = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(a.0)));
    let (top, top_count) = match top {
        Some((value, freq)) => (Some(value.to_string()), freq),
        None => (None, 0),
    };

    Some(CategoricalStats {
        count,
        unique,
        top,
        top_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::sheets::{clean, SheetKind};
    use polars::df;

    #[test]
    fn numeric_stats_on_known_values() {
        let series = Series::new("x", &[1.0f64, 2.0, 3.0, 4.0]);
        let profile = profile_column(&series);
        let stats = profile.numeric.expect("numeric column");

        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, Some(2.5));
        assert_eq!(stats.median, Some(2.5));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(4.0));
        let std = stats.std_dev.expect("std dev");
        assert!((std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(profile.categorical.is_none());
    }

    #[test]
    fn all_null_column_has_empty_stats() {
        let series = Series::new("x", &[None::<f64>, None, None]);
        let profile = profile_column(&series);
        let stats = profile.numeric.expect("numeric column");

        assert_eq!(stats.count, 0);
        assert_eq!(profile.null_count, 3);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn categorical_stats_find_top_value() {
        let series = Series::new(
            "dept",
            &[Some("Guatemala"), Some("Jutiapa"), Some("Guatemala"), None],
        );
        let profile = profile_column(&series);
        let stats = profile.categorical.expect("categorical column");

        assert_eq!(stats.count, 3);
        assert_eq!(stats.unique, 2);
        assert_eq!(stats.top.as_deref(), Some("Guatemala"));
        assert_eq!(stats.top_count, 2);
        assert!(profile.numeric.is_none());
    }

    #[test]
    fn sheet_profile_reports_both_shapes() {
        let frame = df!(
            "departamento" => &["Guatemala", "Jalapa", "Zacapa"],
            "enero" => &[3.0, 1.0, 0.0],
            "febrero" => &[2.0, 5.0, 1.0],
        )
        .unwrap();
        let sheet = clean(SheetKind::Registration, frame, "Cuadro 3").unwrap();
        let profile = profile_sheet(&sheet).unwrap();

        assert_eq!(profile.sheet, "registration");
        assert_eq!(profile.row_count, sheet.wide.height());
        assert_eq!(profile.column_count, sheet.wide.width());
        assert_eq!(profile.long_row_count, 6);
        assert_eq!(profile.columns.len(), 3);
        assert!(profile.correlation.is_some());
    }
}

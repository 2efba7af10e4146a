use serde::Serialize;
use smallvec::SmallVec;

/// Raw cell values kept per column in the JSON summary.
pub const SAMPLE_SIZE: usize = 3;
/// Rows shown by the `head` sections of the console report.
pub const HEAD_ROWS: usize = 5;

/// Descriptive summary of one cleaned sheet.
#[derive(Debug, Clone, Serialize)]
pub struct SheetProfile {
    /// Canonical sheet key (`age_groups`, `registration`, ...).
    pub sheet: String,
    /// Name of the worksheet this was read from.
    pub source_sheet: String,
    pub row_count: usize,
    pub column_count: usize,
    pub long_row_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub correlation: Option<CorrelationMatrix>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
    pub sample_values: SmallVec<[String; SAMPLE_SIZE]>,
    pub numeric: Option<NumericStats>,
    pub categorical: Option<CategoricalStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NumericStats {
    /// Non-null observations.
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation (ddof = 1).
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoricalStats {
    /// Non-null observations.
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub top_count: usize,
}

/// Pearson correlation over the numeric columns of a sheet.
///
/// `values[i][j]` correlates `columns[i]` with `columns[j]`; the matrix is
/// symmetric with a unit diagonal. Degenerate pairs (fewer than two complete
/// observations, or zero variance) are NaN.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    #[serde(serialize_with = "serialize_nan_as_null")]
    pub values: Vec<Vec<f64>>,
}

/// JSON has no NaN; degenerate correlations serialize as null.
fn serialize_nan_as_null<S>(values: &[Vec<f64>], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mapped: Vec<Vec<Option<f64>>> = values
        .iter()
        .map(|row| row.iter().map(|v| v.is_finite().then_some(*v)).collect())
        .collect();
    mapped.serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_correlations_serialize_as_null() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![1.0, f64::NAN], vec![f64::NAN, 1.0]],
        };
        let json = serde_json::to_string(&matrix).unwrap();
        assert!(json.contains("null"));
        assert!(!json.contains("NaN"));
    }
}

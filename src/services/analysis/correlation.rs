use polars::prelude::*;

use crate::error::AppError;
use crate::models::CorrelationMatrix;

/// Pearson correlation over every pair of numeric columns, computed on
/// pairwise-complete observations. `None` when the frame has fewer than two
/// numeric columns to correlate.
pub fn correlation_matrix(df: &DataFrame) -> Result<Option<CorrelationMatrix>, AppError> {
    let numeric: Vec<&Series> = df
        .get_columns()
        .iter()
        .filter(|series| series.dtype().is_numeric())
        .collect();
    if numeric.len() < 2 {
        return Ok(None);
    }

    let mut columns = Vec::with_capacity(numeric.len());
    let mut data: Vec<Vec<Option<f64>>> = Vec::with_capacity(numeric.len());
    for series in &numeric {
        columns.push(series.name().to_string());
        let floats = series.cast(&DataType::Float64)?;
        data.push(floats.f64()?.into_iter().collect());
    }

    let n = data.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = 1.0;
        for j in (i + 1)..n {
            let r = pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(Some(CorrelationMatrix { columns, values }))
}

/// Pearson r over the observations where both sides are present. NaN for
/// degenerate input (fewer than two complete pairs, or zero variance).
fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| x.zip(*y))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        f64::NAN
    } else {
        cov / denom
    }
}

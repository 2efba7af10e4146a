use polars::prelude::*;

use crate::error::AppError;

/// Value counts for one column, descending by count; ties break on the
/// label so the table is deterministic. `limit` keeps the head of the
/// ranking (the occupation tables would otherwise run to hundreds of rows).
pub fn frequency_table(
    df: &DataFrame,
    column: &str,
    limit: Option<usize>,
) -> Result<DataFrame, AppError> {
    if df.column(column).is_err() {
        return Err(AppError::MissingColumn(column.to_string()));
    }

    let mut out = df
        .clone()
        .lazy()
        .select([col(column)])
        .drop_nulls(None)
        .group_by([col(column)])
        .agg([len().alias("count")])
        .sort_by_exprs(
            vec![col("count"), col(column)],
            vec![true, false],
            false,
            false,
        )
        .collect()?;

    if let Some(n) = limit {
        out = out.head(Some(n));
    }
    Ok(out)
}

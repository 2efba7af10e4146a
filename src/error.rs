use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },
    #[error("sheet not found in workbook: {0}")]
    MissingSheet(String),
    #[error("column not found: {0}")]
    MissingColumn(String),
    #[error("dataframe error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("chart error: {0}")]
    Chart(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

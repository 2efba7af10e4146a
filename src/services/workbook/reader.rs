use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use polars::prelude::DataFrame;

use super::frame::frame_from_rows;
use super::utils::normalize_label;
use crate::error::AppError;
use crate::services::sheets::SheetKind;

/// The open divorce-statistics workbook.
pub struct DivorceWorkbook {
    path: PathBuf,
    workbook: Xlsx<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl DivorceWorkbook {
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let workbook: Xlsx<_> = open_workbook(path).map_err(|source| AppError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;
        let sheet_names = workbook.sheet_names().to_vec();
        tracing::debug!("workbook sheets: {:?}", sheet_names);

        Ok(Self {
            path: path.to_path_buf(),
            workbook,
            sheet_names,
        })
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    /// Worksheet name backing `kind`, matched through its name aliases.
    pub fn resolve_sheet(&self, kind: SheetKind) -> Result<&str, AppError> {
        resolve_sheet_name(&self.sheet_names, kind).ok_or_else(|| {
            AppError::MissingSheet(format!(
                "{} (tried: {})",
                kind.key(),
                kind.aliases().join(", ")
            ))
        })
    }

    /// Materialize the worksheet for `kind` as a typed DataFrame.
    pub fn frame(&mut self, kind: SheetKind) -> Result<(String, DataFrame), AppError> {
        let name = self.resolve_sheet(kind)?.to_string();
        let range = self
            .workbook
            .worksheet_range(&name)
            .map_err(|source| AppError::Workbook {
                path: self.path.clone(),
                source,
            })?;
        let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();

        let df = frame_from_rows(&rows)?;
        tracing::debug!(
            sheet = %name,
            rows = df.height(),
            columns = df.width(),
            "materialized worksheet"
        );
        Ok((name, df))
    }
}

fn resolve_sheet_name<'a>(names: &'a [String], kind: SheetKind) -> Option<&'a str> {
    for alias in kind.aliases() {
        let alias = normalize_label(alias);
        let hit = names
            .iter()
            .find(|name| normalize_label(name).contains(&alias));
        if let Some(name) = hit {
            return Some(name.as_str());
        }
    }
    None
}

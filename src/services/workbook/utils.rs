use std::collections::HashSet;

use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Kind of series a worksheet column is materialized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Date,
    Text,
}

/// Rows labelled like this are workbook aggregates, not observations.
static TOTAL_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(total|republica)\b").expect("total label pattern"));

/// Fold accented characters so workbook labels compare byte-wise.
fn fold_diacritics(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        _ => c,
    }
}

/// Lowercased, accent-free copy of a label, used for sheet and month matching.
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritics)
        .collect()
}

pub fn is_total_label(label: &str) -> bool {
    TOTAL_LABEL.is_match(&normalize_label(label))
}

/// Turn a header cell into a unique snake_case column name.
pub fn clean_column_name(name: &str, existing_names: &mut HashSet<String>) -> String {
    let mut base = String::new();
    let mut last_underscore = true;
    for c in normalize_label(name).chars() {
        if c.is_alphanumeric() {
            base.push(c);
            last_underscore = false;
        } else if !last_underscore {
            base.push('_');
            last_underscore = true;
        }
    }
    let base = base.trim_end_matches('_');

    let mut cleaned = if base.chars().next().map_or(true, |c| !c.is_alphabetic()) {
        format!("col_{base}")
    } else {
        base.to_string()
    };

    // Duplicate headers get a numeric suffix.
    let original = cleaned.clone();
    let mut counter = 1;
    while !existing_names.insert(cleaned.clone()) {
        cleaned = format!("{original}_{counter}");
        counter += 1;
    }

    cleaned
}

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a cell that stores a date as text.
pub fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    for format in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

pub fn is_date_string(s: &str) -> bool {
    parse_date_text(s).is_some()
}

/// Decide the series type for a column from its non-empty cells.
///
/// A column is numeric or date when more than half of its populated cells
/// are; everything else stays text.
pub fn detect_column_type(values: &[Data]) -> ColumnType {
    let mut numeric_count = 0usize;
    let mut date_count = 0usize;
    let mut total_count = 0usize;

    for value in values.iter().filter(|v| !matches!(v, Data::Empty)) {
        total_count += 1;
        match value {
            Data::Float(_) | Data::Int(_) => numeric_count += 1,
            Data::DateTime(_) => date_count += 1,
            Data::String(s) if is_date_string(s.trim()) => date_count += 1,
            Data::String(s) if parse_numeric_text(s).is_some() => numeric_count += 1,
            _ => {}
        }
    }

    if total_count == 0 {
        return ColumnType::Text;
    }

    let threshold = total_count as f64 * 0.5;
    if date_count as f64 > threshold {
        ColumnType::Date
    } else if numeric_count as f64 > threshold {
        ColumnType::Numeric
    } else {
        ColumnType::Text
    }
}

/// Parse a count stored as text, tolerating thousands separators and
/// surrounding whitespace ("1,234" and "1 234" both appear in the source
/// workbooks).
pub fn parse_numeric_text(s: &str) -> Option<f64> {
    let compact: String = s.trim().chars().filter(|c| *c != ',' && *c != ' ').collect();
    if compact.is_empty() {
        return None;
    }
    compact.parse::<f64>().ok()
}

use crate::services::workbook::utils::normalize_label;

/// Calendar order for month-labelled axes. Sheet columns arrive in
/// spreadsheet order; anything month-shaped is put back into this order
/// before it reaches a report section or a chart axis.
pub const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_EN: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Zero-based calendar position of a month label, or `None` for anything
/// that is not a month ("total", "ignorado", ...).
pub fn month_order(label: &str) -> Option<usize> {
    let normalized = normalize_label(label);
    MONTHS
        .iter()
        .position(|m| *m == normalized)
        .or_else(|| MONTHS_EN.iter().position(|m| *m == normalized))
        // "setiembre" shows up in some source workbooks.
        .or_else(|| (normalized == "setiembre").then_some(8))
}

/// Sort labelled values into fixed calendar order; non-month labels keep
/// their relative order after the months.
pub fn sort_by_month<T>(entries: &mut Vec<(String, T)>) {
    let mut keyed: Vec<(usize, (String, T))> = entries.drain(..).enumerate().collect();
    keyed.sort_by_key(|(idx, (label, _))| (month_order(label).unwrap_or(MONTHS.len() + idx), *idx));
    entries.extend(keyed.into_iter().map(|(_, entry)| entry));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_order_matches_fixed_list() {
        assert_eq!(month_order("Enero"), Some(0));
        assert_eq!(month_order("DICIEMBRE"), Some(11));
        assert_eq!(month_order("septiembre"), Some(8));
        assert_eq!(month_order("setiembre"), Some(8));
        assert_eq!(month_order("March"), Some(2));
        assert_eq!(month_order("Total"), None);
        assert_eq!(month_order("Ignorado"), None);
    }

    #[test]
    fn sorts_axis_into_calendar_order() {
        let mut entries = vec![
            ("marzo".to_string(), 3.0),
            ("enero".to_string(), 1.0),
            ("ignorado".to_string(), 9.0),
            ("febrero".to_string(), 2.0),
        ];
        sort_by_month(&mut entries);
        let labels: Vec<&str> = entries.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["enero", "febrero", "marzo", "ignorado"]);
    }
}

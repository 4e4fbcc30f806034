use std::fs::File;
use std::io::Read;
use std::path::Path;

use archlens_core::{Column, ColumnKind, Table, Value};
use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::LoadError;

/// Cell contents treated as missing values.
const NULL_MARKERS: [&str; 12] = [
    "", "null", "NULL", "NaN", "nan", "-NaN", "NA", "N/A", "n/a", "#N/A", "None", "<NA>",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Load an inventory export from a CSV file with a header row.
pub fn load_table_csv(path: &Path) -> Result<Table, LoadError> {
    let file = File::open(path)?;
    let table = load_table_from_reader(file)?;
    tracing::debug!(
        event = "table_loaded",
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count()
    );
    Ok(table)
}

/// Load an inventory export from any CSV reader.
///
/// Column kinds are inferred from the non-null cells: all numbers gives a
/// numeric column, all dates a date column, anything else a categorical
/// column. Columns with no values at all are numeric.
pub fn load_table_from_reader<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        .map(|header| header.to_string())
        .collect::<Vec<_>>();
    if headers.is_empty() || headers.iter().all(|header| header.is_empty()) {
        return Err(LoadError::MissingHeader);
    }

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (idx, column) in cells.iter_mut().enumerate() {
            let raw = record.get(idx).unwrap_or_default();
            column.push(normalize_cell(raw));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| build_column(name, raw))
        .collect::<Vec<_>>();

    Table::new(columns).map_err(LoadError::from)
}

/// Parse a date or timestamp cell, keeping only the calendar date.
pub(crate) fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(text, format) {
            return Some(timestamp.date());
        }
    }
    None
}

fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if NULL_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn build_column(name: String, raw: Vec<Option<String>>) -> Column {
    let kind = infer_kind(&raw);
    let values = raw
        .into_iter()
        .map(|cell| match cell {
            None => Value::Null,
            Some(text) => match kind {
                ColumnKind::Numeric => text
                    .parse::<f64>()
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                ColumnKind::Date => parse_date(&text).map(Value::Date).unwrap_or(Value::Null),
                ColumnKind::Categorical => Value::Text(text),
            },
        })
        .collect();
    Column::new(name, kind, values)
}

fn infer_kind(raw: &[Option<String>]) -> ColumnKind {
    let present = raw.iter().flatten().collect::<Vec<_>>();
    if present.iter().all(|text| text.parse::<f64>().is_ok()) {
        ColumnKind::Numeric
    } else if present.iter().all(|text| parse_date(text).is_some()) {
        ColumnKind::Date
    } else {
        ColumnKind::Categorical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_date_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date("2024/03/15"), expected);
        assert_eq!(parse_date("15.03.2024"), expected);
        assert_eq!(parse_date("2024-03-15 08:30:00"), expected);
        assert_eq!(parse_date("2024-03-15T08:30:00"), expected);
        assert_eq!(parse_date("March 15th"), None);
    }

    #[test]
    fn infers_kinds_from_present_cells() {
        let numeric = vec![Some("1".to_string()), None, Some("2.5".to_string())];
        let dates = vec![Some("2024-01-01".to_string()), None];
        let text = vec![Some("1".to_string()), Some("High".to_string())];
        let empty: Vec<Option<String>> = vec![None, None];

        assert_eq!(infer_kind(&numeric), ColumnKind::Numeric);
        assert_eq!(infer_kind(&dates), ColumnKind::Date);
        assert_eq!(infer_kind(&text), ColumnKind::Categorical);
        assert_eq!(infer_kind(&empty), ColumnKind::Numeric);
    }

    #[test]
    fn null_markers_become_missing() {
        assert_eq!(normalize_cell("  "), None);
        assert_eq!(normalize_cell("N/A"), None);
        assert_eq!(normalize_cell("NaN"), None);
        assert_eq!(normalize_cell(" CRM "), Some("CRM".to_string()));
    }
}

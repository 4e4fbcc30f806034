use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validation::validate_columns;

/// Declared kind of a column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Date,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Date => "date",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cell.
///
/// `Number(NaN)` is treated as missing, the same as `Null`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Number(value) => value.is_nan(),
            _ => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) if !value.is_nan() => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Display label used when the value is treated as a category.
    pub fn label(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        match self {
            Value::Null => None,
            Value::Number(value) => Some(format_number_label(*value)),
            Value::Text(value) => Some(value.clone()),
            Value::Date(value) => Some(value.format("%Y-%m-%d").to_string()),
        }
    }

    /// Stable key used to compare whole rows.
    ///
    /// Keys of different variants never collide, and all missing values share
    /// one key.
    pub fn key(&self) -> String {
        if self.is_null() {
            return "n:".to_string();
        }
        match self {
            Value::Null => "n:".to_string(),
            // -0.0 == 0.0, so both share a key.
            Value::Number(value) if *value == 0.0 => "f:0".to_string(),
            Value::Number(value) => format!("f:{}", value),
            Value::Text(value) => format!("s:{}", escape_key_component(value)),
            Value::Date(value) => format!("d:{}", value.format("%Y-%m-%d")),
        }
    }

    pub(crate) fn variant_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
        }
    }

    pub(crate) fn fits(&self, kind: ColumnKind) -> bool {
        matches!(
            (self, kind),
            (Value::Null, _)
                | (Value::Number(_), ColumnKind::Numeric)
                | (Value::Text(_), ColumnKind::Categorical)
                | (Value::Date(_), ColumnKind::Date)
        )
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Build a numeric column; `None` entries become nulls.
    pub fn numeric<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<f64>>,
    {
        let values = values
            .into_iter()
            .map(|value| match value.into() {
                Some(number) => Value::Number(number),
                None => Value::Null,
            })
            .collect();
        Self::new(name, ColumnKind::Numeric, values)
    }

    /// Build a categorical column; `None` entries become nulls.
    pub fn categorical<'a, I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<&'a str>>,
    {
        let values = values
            .into_iter()
            .map(|value| match value.into() {
                Some(text) => Value::Text(text.to_string()),
                None => Value::Null,
            })
            .collect();
        Self::new(name, ColumnKind::Categorical, values)
    }

    /// Build a date column; `None` entries become nulls.
    pub fn dates<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Option<NaiveDate>>,
    {
        let values = values
            .into_iter()
            .map(|value| match value.into() {
                Some(date) => Value::Date(date),
                None => Value::Null,
            })
            .collect();
        Self::new(name, ColumnKind::Date, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_null()).count()
    }
}

/// Immutable in-memory table.
///
/// Construction validates that every column has the same length, that column
/// names are unique and that every value fits its declared kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        validate_columns(&columns)?;
        let rows = columns.first().map(Column::len).unwrap_or(0);
        Ok(Self { columns, rows })
    }

    /// Table with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Numeric values of a column, or `None` when the column is absent.
    ///
    /// Fails when the column exists but is not declared numeric.
    pub fn numeric(&self, name: &str) -> Result<Option<Vec<Option<f64>>>> {
        let column = match self.column(name) {
            Some(column) => column,
            None => return Ok(None),
        };
        if column.kind != ColumnKind::Numeric {
            return Err(Error::NonNumericColumn {
                column: column.name.clone(),
                kind: column.kind,
            });
        }
        Ok(Some(column.values.iter().map(Value::as_number).collect()))
    }

    /// Category labels of a column, or `None` when the column is absent.
    pub fn labels(&self, name: &str) -> Option<Vec<Option<String>>> {
        self.column(name)
            .map(|column| column.values.iter().map(Value::label).collect())
    }

    /// Values of one row, in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Value>> {
        if index >= self.rows {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|column| &column.values[index])
                .collect(),
        )
    }
}

fn format_number_label(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn escape_key_component(value: &str) -> String {
    value.replace('\\', "\\\\").replace('|', "\\|")
}

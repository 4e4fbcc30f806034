use thiserror::Error;

use crate::table::ColumnKind;

/// Structural errors raised by table construction and typed column access.
///
/// Every variant describes a malformed table: the caller must fix the input
/// before a report can be produced. A missing optional column is never an
/// error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Columns disagree on the number of rows.
    #[error("malformed table: column '{column}' has {found} row(s), expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        found: usize,
    },
    /// Two columns share the same name.
    #[error("malformed table: duplicate column name '{0}'")]
    DuplicateColumn(String),
    /// A value does not match the declared column kind.
    #[error("malformed table: {kind} column '{column}' holds a {found} value at row {row}")]
    KindMismatch {
        column: String,
        kind: ColumnKind,
        found: &'static str,
        row: usize,
    },
    /// A numeric aggregate was requested on a non-numeric column.
    #[error("malformed table: numeric aggregate requested on {kind} column '{column}'")]
    NonNumericColumn { column: String, kind: ColumnKind },
}

impl Error {
    /// Column the error refers to.
    pub fn column(&self) -> &str {
        match self {
            Error::RaggedColumn { column, .. }
            | Error::KindMismatch { column, .. }
            | Error::NonNumericColumn { column, .. } => column,
            Error::DuplicateColumn(column) => column,
        }
    }
}

/// Convenience alias for results returned by archlens crates.
pub type Result<T> = std::result::Result<T, Error>;

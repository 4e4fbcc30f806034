use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::table::Column;

/// Validate the structural invariants of a set of columns.
///
/// This checks:
/// - duplicate column names
/// - every column has the same number of rows as the first one
/// - every non-null value matches the declared column kind
pub fn validate_columns(columns: &[Column]) -> Result<()> {
    let mut names = BTreeSet::new();
    for column in columns {
        if !names.insert(column.name.as_str()) {
            return Err(Error::DuplicateColumn(column.name.clone()));
        }
    }

    let expected = match columns.first() {
        Some(column) => column.len(),
        None => return Ok(()),
    };

    for column in columns {
        if column.len() != expected {
            return Err(Error::RaggedColumn {
                column: column.name.clone(),
                expected,
                found: column.len(),
            });
        }

        if let Some((row, value)) = column
            .values
            .iter()
            .enumerate()
            .find(|(_, value)| !value.fits(column.kind))
        {
            return Err(Error::KindMismatch {
                column: column.name.clone(),
                kind: column.kind,
                found: value.variant_name(),
                row,
            });
        }
    }

    Ok(())
}

//! Core contracts for archlens.
//!
//! This crate defines the in-memory inventory table, the well-known column
//! names of an architecture inventory export, and the structural validation
//! shared by the loader, the metrics engine and the CLI.

pub mod columns;
pub mod error;
pub mod table;
pub mod validation;

pub use error::{Error, Result};
pub use table::{Column, ColumnKind, Table, Value};
pub use validation::validate_columns;

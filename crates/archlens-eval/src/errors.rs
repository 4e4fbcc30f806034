use thiserror::Error;

/// Errors emitted while loading an inventory table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("input has no header row")]
    MissingHeader,
    #[error("{0}")]
    Table(#[from] archlens_core::Error),
}

/// Errors emitted by the metrics engine.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("failed to load table: {0}")]
    Load(#[from] LoadError),
    #[error(transparent)]
    MalformedTable(#[from] archlens_core::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

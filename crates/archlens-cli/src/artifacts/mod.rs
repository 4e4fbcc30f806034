mod atomic;
mod reports;
mod settings;

pub use reports::write_report;
pub use settings::load_engine_config;

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("invalid artifact path: {0}")]
    InvalidPath(String),
}

pub type ArtifactResult<T> = Result<T, ArtifactError>;

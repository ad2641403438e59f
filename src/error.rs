//! Error types for clasificar

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The training request contradicts the trainer's configuration,
    /// e.g. a validation-prefixed monitor metric without validation data.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The architecture specification could not produce a valid
    /// computation graph. Fatal to trainer construction.
    #[error("Architecture build failed: {0}")]
    ArchitectureBuild(String),

    /// Feature, label, or parameter shapes disagree.
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error types for model construction.

use thiserror::Error;

/// Errors encountered while building a motor model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

pub type ModelResult<T> = Result<T, ModelError>;

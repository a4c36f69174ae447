//! Error types for sequence loading and criteria enforcement.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while loading or validating a sequence definition.
///
/// All of these occur before any step executes; a run that has started
/// always finishes with a complete record instead of an error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to read sequence file: {path}")]
    SequenceFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid sequence definition: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Sequence validation failed: {what}")]
    Validation { what: String },
}

pub type EngineResult<T> = Result<T, EngineError>;

/// A monitored sample breached a configured bound.
///
/// Display output is the run's failure reason verbatim, so it names both
/// the offending value and the bound.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("Speed violation: {value:.2} < {min}")]
    SpeedBelowMin { value: f64, min: f64 },

    #[error("Speed violation: {value:.2} > {max}")]
    SpeedAboveMax { value: f64, max: f64 },

    #[error("Temperature violation: {value:.2} > {max}")]
    TemperatureAboveMax { value: f64, max: f64 },
}

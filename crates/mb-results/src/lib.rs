//! mb-results: run record assembly and JSON report storage.

pub mod builder;
pub mod store;
pub mod types;

pub use builder::ReportBuilder;
pub use store::ReportStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Report not found: {filename}")]
    ReportNotFound { filename: String },
}

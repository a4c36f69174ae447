//! mb-core: shared foundation for the motorbench workspace.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers shared by model and tests)

pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use numeric::*;

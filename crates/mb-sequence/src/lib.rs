//! Test-sequence engine for the virtual motor bench.
//!
//! Provides:
//! - YAML sequence schema (`test_info` block + ordered step list)
//! - Closed step-kind enum with exhaustive dispatch
//! - Synchronous runner: drives the controller step by step, samples
//!   telemetry in monitor windows, and enforces numeric criteria
//! - Cooperative abort checked at step boundaries
//! - Run record assembly via mb-results

pub mod error;
pub mod runner;
pub mod schema;

pub use error::{EngineError, EngineResult, Violation};
pub use runner::{AbortHandle, RunProgress, RunStats, SAMPLE_PERIOD_S, SequenceRunner};
pub use schema::{Bounds, Criteria, SequenceDef, StepDef, StepKind, TestInfoDef, load_sequence};

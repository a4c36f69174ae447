//! Concurrency-safe motor controller.
//!
//! Provides:
//! - Three-state soft-stop machine (Stopped / Running / Stopping)
//! - `ControllerCore`: thread-free tick and command logic
//! - `MotorController`: one model instance behind one mutex, ticked at a
//!   fixed 10 Hz rate by a dedicated background thread
//!
//! Every command and the background tick hold the same lock, so a command
//! applies strictly before or strictly after a tick's update, never mid-way.

pub mod controller;
pub mod core;

pub use crate::controller::{MotorController, SHUTDOWN_GRACE, TICK_PERIOD_S};
pub use crate::core::{ControllerCore, MotorPhase, SOFT_STOP_THRESHOLD_RPM};

//! Discrete-time motor physics model.
//!
//! Provides:
//! - Motor profile (static physical limits of a simulated motor)
//! - Inputs (target speed, applied load) and state (speed, torque, temperature)
//! - Fixed-step update with a simple linear speed/thermal model
//! - Named fault injection ("overheat" adds a heat bias)
//! - Thermal trip: exceeding the profile's max temperature forces a stop

pub mod error;
pub mod motor;
pub mod profile;

// Re-exports for public API
pub use error::{ModelError, ModelResult};
pub use motor::{MotorInputs, MotorSim, MotorSnapshot, MotorState};
pub use profile::MotorProfile;

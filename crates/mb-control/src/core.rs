//! Thread-free controller logic: phase machine plus tick.
//!
//! Kept separate from the threading wrapper so the soft-stop protocol can be
//! driven tick-by-tick in tests without touching wall-clock time.

use mb_model::{MotorProfile, MotorSim, MotorSnapshot};

/// Below this speed magnitude (RPM) a soft stop completes with a hard stop.
pub const SOFT_STOP_THRESHOLD_RPM: f64 = 1.0;

/// Controller phase for the soft-stop protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorPhase {
    /// Motor powered off.
    Stopped,
    /// Motor powered and tracking its target speed.
    Running,
    /// Soft stop in progress: target forced to zero, decelerating.
    Stopping,
}

/// One motor model plus the phase machine that sequences soft stops.
#[derive(Debug)]
pub struct ControllerCore {
    motor: MotorSim,
    phase: MotorPhase,
}

impl ControllerCore {
    pub fn new(profile: MotorProfile) -> Self {
        Self {
            motor: MotorSim::new(profile),
            phase: MotorPhase::Stopped,
        }
    }

    pub fn phase(&self) -> MotorPhase {
        self.phase
    }

    /// Power the motor on, cancelling any soft stop in progress.
    pub fn start_motor(&mut self) {
        self.phase = MotorPhase::Running;
        self.motor.start();
        tracing::info!("motor started");
    }

    /// Begin a soft stop: zero the target and let the model decelerate.
    /// The tick transitions to Stopped once speed falls below threshold.
    pub fn stop_motor(&mut self) {
        self.phase = MotorPhase::Stopping;
        self.motor.set_target_speed(0.0);
        tracing::warn!("motor stopping (soft stop initiated)");
    }

    /// Set the target speed. Ignored while a soft stop is decelerating so
    /// commands cannot fight the stop.
    pub fn set_target_speed(&mut self, rpm: f64) {
        if self.phase == MotorPhase::Stopping {
            tracing::debug!(rpm, "ignoring target speed while stopping");
            return;
        }
        self.motor.set_target_speed(rpm);
        tracing::info!(rpm, "target speed set");
    }

    /// Apply a brake load. Always honored, in every phase: a load
    /// disturbance is modeled even while decelerating or stopped.
    pub fn set_load(&mut self, load_nm: f64) {
        self.motor.set_load(load_nm);
        tracing::info!(load_nm, "load set");
    }

    pub fn inject_fault(&mut self, name: impl Into<String>) {
        self.motor.inject_fault(name);
    }

    pub fn clear_fault(&mut self) {
        self.motor.clear_fault();
    }

    /// Telemetry snapshot, self-consistent with the last completed tick.
    pub fn status(&self) -> MotorSnapshot {
        self.motor.snapshot()
    }

    /// One fixed step: soft-stop bookkeeping, then the model update.
    pub fn tick(&mut self, dt: f64) {
        if self.phase == MotorPhase::Stopping {
            self.motor.set_target_speed(0.0);
            if self.motor.state().speed_rpm.abs() < SOFT_STOP_THRESHOLD_RPM {
                self.motor.stop();
                self.phase = MotorPhase::Stopped;
                tracing::info!("soft stop complete, motor off");
            }
        }
        self.motor.update(dt);
    }
}

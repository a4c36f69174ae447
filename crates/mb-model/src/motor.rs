//! Motor simulator: inputs, state, and the fixed-step update.

use crate::profile::{AMBIENT_TEMP_C, MotorProfile};
use mb_core::round_to;
use serde::{Deserialize, Serialize};

/// Fraction of applied load that retards acceleration (RPM/s per N.m).
const LOAD_DRAG: f64 = 0.1;
/// Heat generated per RPM of shaft speed (C/s per RPM).
const HEAT_PER_RPM: f64 = 0.002;
/// Heat generated per N.m of applied load (C/s per N.m).
const HEAT_PER_NM: f64 = 0.05;
/// Extra heat bias while the "overheat" fault is active (C/s).
const OVERHEAT_BIAS: f64 = 2.0;

/// Decimal places reported by telemetry snapshots.
const SNAPSHOT_DECIMALS: u32 = 2;

/// Commanded inputs, written only through mutator calls.
#[derive(Debug, Clone, PartialEq)]
pub struct MotorInputs {
    /// Requested shaft speed (RPM).
    pub target_speed_rpm: f64,
    /// Applied brake load (N.m).
    pub load_nm: f64,
    /// Ambient temperature the motor dissipates into (Celsius).
    pub ambient_temp_c: f64,
}

impl Default for MotorInputs {
    fn default() -> Self {
        Self {
            target_speed_rpm: 0.0,
            load_nm: 0.0,
            ambient_temp_c: AMBIENT_TEMP_C,
        }
    }
}

/// Dynamic state, written only by `update`.
#[derive(Debug, Clone, PartialEq)]
pub struct MotorState {
    /// Current shaft speed (RPM, always >= 0).
    pub speed_rpm: f64,
    /// Current shaft torque (N.m, mirrors applied load).
    pub torque_nm: f64,
    /// Current winding temperature (Celsius).
    pub temperature_c: f64,
    /// Whether the motor is powered.
    pub running: bool,
}

impl Default for MotorState {
    fn default() -> Self {
        Self {
            speed_rpm: 0.0,
            torque_nm: 0.0,
            temperature_c: AMBIENT_TEMP_C,
            running: false,
        }
    }
}

/// Read-only telemetry copy of the motor state, rounded for consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorSnapshot {
    pub speed_rpm: f64,
    pub torque_nm: f64,
    pub temperature_c: f64,
    pub running: bool,
    pub fault: Option<String>,
}

/// Discrete-time motor physics model.
///
/// `update(dt)` advances the state by exactly one step; every other method
/// mutates inputs or the running flag only and never triggers an update.
#[derive(Debug, Clone)]
pub struct MotorSim {
    profile: MotorProfile,
    inputs: MotorInputs,
    state: MotorState,
    fault: Option<String>,
}

impl MotorSim {
    pub fn new(profile: MotorProfile) -> Self {
        Self {
            profile,
            inputs: MotorInputs::default(),
            state: MotorState::default(),
            fault: None,
        }
    }

    pub fn profile(&self) -> &MotorProfile {
        &self.profile
    }

    pub fn inputs(&self) -> &MotorInputs {
        &self.inputs
    }

    pub fn state(&self) -> &MotorState {
        &self.state
    }

    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Power the motor on. Also clears a previous thermal trip.
    pub fn start(&mut self) {
        self.state.running = true;
    }

    /// Hard stop: power off and zero the target speed.
    ///
    /// Soft-stop semantics (decelerate first) are enforced one layer up by
    /// the controller; the model itself only knows the hard variant.
    pub fn stop(&mut self) {
        self.state.running = false;
        self.inputs.target_speed_rpm = 0.0;
    }

    /// Set the requested speed. Negative targets are accepted; the update
    /// equation floors actual speed at zero.
    pub fn set_target_speed(&mut self, rpm: f64) {
        self.inputs.target_speed_rpm = rpm;
    }

    pub fn set_load(&mut self, load_nm: f64) {
        self.inputs.load_nm = load_nm;
    }

    /// Activate a named fault. Only "overheat" perturbs the equations today;
    /// other names are carried through telemetry untouched.
    pub fn inject_fault(&mut self, name: impl Into<String>) {
        self.fault = Some(name.into());
    }

    pub fn clear_fault(&mut self) {
        self.fault = None;
    }

    /// Advance the model by `dt` seconds. No-op while the motor is off.
    pub fn update(&mut self, dt: f64) {
        if !self.state.running {
            return;
        }

        // Speed dynamics: first-order pull toward target, retarded by load.
        let speed_error = self.inputs.target_speed_rpm - self.state.speed_rpm;
        let accel = speed_error / self.profile.inertia - self.inputs.load_nm * LOAD_DRAG;
        self.state.speed_rpm += accel * dt;

        // The motor cannot run in reverse in this model.
        self.state.speed_rpm = self.state.speed_rpm.max(0.0);

        // Torque approximation: mirrors the applied load.
        self.state.torque_nm = self.inputs.load_nm;

        // Thermal dynamics: generation vs dissipation to ambient.
        let heat_generated =
            self.state.speed_rpm.abs() * HEAT_PER_RPM + self.inputs.load_nm * HEAT_PER_NM;
        let heat_dissipated = (self.state.temperature_c - self.inputs.ambient_temp_c)
            / self.profile.thermal_resistance;
        self.state.temperature_c += (heat_generated - heat_dissipated) * dt;

        if let Some(bias) = self.fault.as_deref().map(fault_heat_bias) {
            self.state.temperature_c += bias * dt;
        }

        // Thermal trip: terminal for this tick, a later start() runs again.
        if self.state.temperature_c > self.profile.max_temp_c {
            tracing::warn!(
                temperature_c = self.state.temperature_c,
                max_temp_c = self.profile.max_temp_c,
                "thermal trip: forcing motor stop"
            );
            self.stop();
        }
    }

    /// Rounded, self-consistent telemetry copy of the current state.
    pub fn snapshot(&self) -> MotorSnapshot {
        MotorSnapshot {
            speed_rpm: round_to(self.state.speed_rpm, SNAPSHOT_DECIMALS),
            torque_nm: round_to(self.state.torque_nm, SNAPSHOT_DECIMALS),
            temperature_c: round_to(self.state.temperature_c, SNAPSHOT_DECIMALS),
            running: self.state.running,
            fault: self.fault.clone(),
        }
    }
}

/// Additive heat bias for a named fault (C/s). Unknown names contribute none.
fn fault_heat_bias(name: &str) -> f64 {
    match name {
        "overheat" => OVERHEAT_BIAS,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mb_core::{Tolerances, nearly_equal};

    const DT: f64 = 0.1;

    fn bench_motor() -> MotorSim {
        MotorSim::new(MotorProfile::default())
    }

    #[test]
    fn no_dynamics_while_stopped() {
        let mut motor = bench_motor();
        motor.set_target_speed(2000.0);
        motor.set_load(5.0);

        let before = motor.state().clone();
        for _ in 0..50 {
            motor.update(DT);
        }
        assert_eq!(motor.state(), &before);
    }

    #[test]
    fn spins_up_toward_target() {
        let mut motor = bench_motor();
        motor.start();
        motor.set_target_speed(2000.0);

        let mut last = 0.0;
        for _ in 0..100 {
            motor.update(DT);
            let speed = motor.state().speed_rpm;
            assert!(speed >= last, "speed should rise monotonically toward target");
            last = speed;
        }
        assert!(last > 1000.0);
        assert!(last < 2000.0);
    }

    #[test]
    fn unloaded_spin_up_matches_closed_form() {
        let mut motor = bench_motor();
        motor.start();
        motor.set_target_speed(2000.0);
        for _ in 0..100 {
            motor.update(DT);
        }
        // With no load the speed recurrence is a geometric approach:
        // s_n = target * (1 - (1 - dt/inertia)^n).
        let decay = 1.0 - DT / motor.profile().inertia;
        let expected = 2000.0 * (1.0 - decay.powi(100));
        assert!(nearly_equal(
            motor.state().speed_rpm,
            expected,
            Tolerances::default()
        ));
    }

    #[test]
    fn speed_never_negative() {
        let mut motor = bench_motor();
        motor.start();
        // Heavy load with zero target drags the accel term negative.
        motor.set_load(50.0);
        for _ in 0..200 {
            motor.update(DT);
            assert!(motor.state().speed_rpm >= 0.0);
        }
    }

    #[test]
    fn torque_mirrors_load() {
        let mut motor = bench_motor();
        motor.start();
        motor.set_load(7.5);
        motor.update(DT);
        assert_eq!(motor.state().torque_nm, 7.5);
    }

    #[test]
    fn stop_resets_target_speed() {
        let mut motor = bench_motor();
        motor.start();
        motor.set_target_speed(1500.0);
        motor.stop();
        assert!(!motor.state().running);
        assert_eq!(motor.inputs().target_speed_rpm, 0.0);
    }

    #[test]
    fn overheat_fault_trips_motor() {
        let profile = MotorProfile::new(3000.0, 30.0, 10.0, 10.0).unwrap();
        let mut motor = MotorSim::new(profile);
        motor.start();
        motor.set_target_speed(1000.0);
        motor.inject_fault("overheat");

        let mut tripped = false;
        for _ in 0..500 {
            motor.update(DT);
            if motor.state().temperature_c > 30.0 {
                // The trip lands on the same tick that detects the excursion.
                assert!(!motor.state().running);
                assert_eq!(motor.inputs().target_speed_rpm, 0.0);
                tripped = true;
                break;
            }
        }
        assert!(tripped, "overheat bias should push past a 30 C limit");
    }

    #[test]
    fn unknown_fault_has_no_bias() {
        let mut biased = bench_motor();
        let mut plain = bench_motor();
        for m in [&mut biased, &mut plain] {
            m.start();
            m.set_target_speed(1000.0);
        }
        biased.inject_fault("phase_loss");

        for _ in 0..50 {
            biased.update(DT);
            plain.update(DT);
        }
        assert!(
            nearly_equal(
                biased.state().temperature_c,
                plain.state().temperature_c,
                Tolerances::default()
            ),
            "unnamed faults must not perturb the thermal equations"
        );
        assert_eq!(biased.snapshot().fault.as_deref(), Some("phase_loss"));
    }

    #[test]
    fn restart_after_trip_runs_again() {
        let profile = MotorProfile::new(3000.0, 30.0, 10.0, 10.0).unwrap();
        let mut motor = MotorSim::new(profile);
        motor.start();
        motor.inject_fault("overheat");
        for _ in 0..100 {
            motor.update(DT);
        }
        assert!(!motor.state().running);

        motor.clear_fault();
        motor.start();
        motor.set_target_speed(500.0);
        motor.update(DT);
        assert!(motor.state().speed_rpm > 0.0);
    }

    #[test]
    fn snapshot_rounds_to_two_decimals() {
        let mut motor = bench_motor();
        motor.start();
        motor.set_target_speed(1234.5678);
        motor.update(DT);

        let snap = motor.snapshot();
        assert_eq!(snap.speed_rpm, round_to(motor.state().speed_rpm, 2));
        assert_eq!(snap.temperature_c, round_to(motor.state().temperature_c, 2));
        assert!(snap.running);
        assert_eq!(snap.fault, None);
    }

    #[test]
    fn snapshot_is_idempotent() {
        let mut motor = bench_motor();
        motor.start();
        motor.set_target_speed(800.0);
        motor.update(DT);
        assert_eq!(motor.snapshot(), motor.snapshot());
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn speed_stays_non_negative(
                target in -5000.0f64..5000.0,
                load in 0.0f64..100.0,
                ticks in 1usize..300,
            ) {
                let mut motor = bench_motor();
                motor.start();
                motor.set_target_speed(target);
                motor.set_load(load);
                for _ in 0..ticks {
                    motor.update(DT);
                    prop_assert!(motor.state().speed_rpm >= 0.0);
                }
            }

            #[test]
            fn stopped_motor_is_inert(
                target in -5000.0f64..5000.0,
                load in 0.0f64..100.0,
                ticks in 1usize..100,
            ) {
                let mut motor = bench_motor();
                motor.set_target_speed(target);
                motor.set_load(load);
                let before = motor.state().clone();
                for _ in 0..ticks {
                    motor.update(DT);
                }
                prop_assert_eq!(motor.state(), &before);
            }
        }
    }
}

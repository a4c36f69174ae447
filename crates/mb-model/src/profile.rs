//! Static physical parameters of a simulated motor.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};

/// Default ambient temperature used by the thermal model (Celsius).
pub const AMBIENT_TEMP_C: f64 = 25.0;

/// Immutable physical limits of a motor, set at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorProfile {
    /// Rated speed (RPM).
    pub rated_speed_rpm: f64,
    /// Maximum safe winding temperature (Celsius). Exceeding it trips the motor.
    pub max_temp_c: f64,
    /// Rotational inertia (dimensionless scale factor on acceleration).
    pub inertia: f64,
    /// Thermal resistance (dimensionless scale factor on heat dissipation).
    pub thermal_resistance: f64,
}

impl MotorProfile {
    /// Create a validated motor profile.
    pub fn new(
        rated_speed_rpm: f64,
        max_temp_c: f64,
        inertia: f64,
        thermal_resistance: f64,
    ) -> ModelResult<Self> {
        if rated_speed_rpm <= 0.0 {
            return Err(ModelError::InvalidArg {
                what: "rated_speed_rpm must be positive",
            });
        }
        if max_temp_c <= AMBIENT_TEMP_C {
            return Err(ModelError::InvalidArg {
                what: "max_temp_c must be above ambient",
            });
        }
        if inertia <= 0.0 {
            return Err(ModelError::InvalidArg {
                what: "inertia must be positive",
            });
        }
        if thermal_resistance <= 0.0 {
            return Err(ModelError::InvalidArg {
                what: "thermal_resistance must be positive",
            });
        }
        Ok(Self {
            rated_speed_rpm,
            max_temp_c,
            inertia,
            thermal_resistance,
        })
    }
}

impl Default for MotorProfile {
    /// The reference bench motor: 3000 RPM rated, 150 C trip, inertia 10,
    /// thermal resistance 10.
    fn default() -> Self {
        Self {
            rated_speed_rpm: 3000.0,
            max_temp_c: 150.0,
            inertia: 10.0,
            thermal_resistance: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_profile() {
        let p = MotorProfile::new(3000.0, 150.0, 10.0, 10.0).unwrap();
        assert_eq!(p.rated_speed_rpm, 3000.0);
    }

    #[test]
    fn invalid_profile_params() {
        assert!(MotorProfile::new(0.0, 150.0, 10.0, 10.0).is_err());
        assert!(MotorProfile::new(3000.0, 20.0, 10.0, 10.0).is_err());
        assert!(MotorProfile::new(3000.0, 150.0, 0.0, 10.0).is_err());
        assert!(MotorProfile::new(3000.0, 150.0, 10.0, -1.0).is_err());
    }

    #[test]
    fn default_profile_is_valid() {
        let p = MotorProfile::default();
        assert!(
            MotorProfile::new(p.rated_speed_rpm, p.max_temp_c, p.inertia, p.thermal_resistance)
                .is_ok()
        );
    }
}

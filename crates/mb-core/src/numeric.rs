/// Floating point type used throughout the bench
pub type Real = f64;

/// Absolute/relative tolerance pair for comparing computed floats.
///
/// The defaults suit telemetry-scale values (RPM in the thousands,
/// temperatures below a few hundred); tighten `abs` when comparing
/// near-zero quantities.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-9,
        }
    }
}

/// True when `a` and `b` agree within the absolute or the relative bound.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// Round to a fixed number of decimal places.
///
/// Telemetry snapshots report values rounded to two decimals; keeping the
/// rounding in one place means every consumer sees the same figures.
pub fn round_to(v: Real, decimals: u32) -> Real {
    let factor = 10f64.powi(decimals as i32);
    (v * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_scales_with_magnitude() {
        let tol = Tolerances::default();
        // Telemetry-scale values: the relative bound dominates.
        assert!(nearly_equal(1500.0, 1500.0 + 1e-7, tol));
        assert!(!nearly_equal(1500.0, 1500.1, tol));
        // Near zero: the absolute bound takes over.
        assert!(nearly_equal(0.0, 5e-10, tol));
        assert!(!nearly_equal(0.0, 1e-6, tol));
    }

    #[test]
    fn round_to_two_decimals() {
        assert_eq!(round_to(1234.5678, 2), 1234.57);
        assert_eq!(round_to(-0.005, 2), -0.01);
        assert_eq!(round_to(25.0, 2), 25.0);
    }
}

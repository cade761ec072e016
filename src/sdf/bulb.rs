//! Escape-time distance estimator for the power-N "bulb" fractal.
//!
//! Iterates `w -> w^N + p` in spherical coordinates while tracking the
//! running derivative `dz`, then estimates distance as
//! `0.25 * ln(m) * sqrt(m) / dz` with `m = |w|²` at exit.
//!
//! The estimator is not strictly 1-Lipschitz. Containment decisions built on
//! it are a heuristic and may prune close to high-curvature detail.

use super::DistanceField;
use crate::core::types::{DVec3, Vec3};

/// Default exponent of the bulb map
pub const DEFAULT_POWER: f32 = 8.0;
/// Default iteration count
pub const DEFAULT_ITERATIONS: u32 = 4;
/// Default bailout on the squared magnitude
pub const DEFAULT_BAILOUT: f32 = 256.0;

/// Power-N bulb distance estimator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mandelbulb {
    /// Exponent N of the bulb map
    pub power: f32,
    /// Maximum number of iterations
    pub iterations: u32,
    /// Early exit once `|w|²` exceeds this
    pub bailout: f32,
}

impl Default for Mandelbulb {
    fn default() -> Self {
        Self {
            power: DEFAULT_POWER,
            iterations: DEFAULT_ITERATIONS,
            bailout: DEFAULT_BAILOUT,
        }
    }
}

impl Mandelbulb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_bailout(mut self, bailout: f32) -> Self {
        self.bailout = bailout;
        self
    }

    /// Distance estimate in double precision.
    ///
    /// First-iteration powers of points far from the bulb overflow `f32`
    /// long before they overflow `f64`.
    pub fn distance_f64(&self, p: DVec3) -> f64 {
        let n = self.power as f64;
        let bailout = self.bailout as f64;

        let mut w = p;
        let mut m = w.length_squared();
        let mut dz = 1.0_f64;

        for _ in 0..self.iterations {
            dz = n * m.powf((n - 1.0) * 0.5) * dz + 1.0;

            let r = m.sqrt();
            w = if r > 0.0 {
                let theta = n * (w.y / r).clamp(-1.0, 1.0).acos();
                let phi = n * w.x.atan2(w.z);
                let (sin_t, cos_t) = theta.sin_cos();
                let (sin_p, cos_p) = phi.sin_cos();
                p + r.powf(n) * DVec3::new(sin_t * sin_p, cos_t, sin_t * cos_p)
            } else {
                // No angles at the origin; w^N = 0
                p
            };

            m = w.length_squared();
            if m > bailout {
                break;
            }
        }

        // ln(m) * sqrt(m) -> 0 as m -> 0
        if m <= 0.0 {
            return 0.0;
        }
        0.25 * m.ln() * m.sqrt() / dz
    }
}

impl DistanceField for Mandelbulb {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        self.distance_f64(p.as_dvec3()) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let bulb = Mandelbulb::default();
        assert_eq!(bulb.power, 8.0);
        assert_eq!(bulb.iterations, 4);
        assert_eq!(bulb.bailout, 256.0);
    }

    #[test]
    fn test_origin_is_finite() {
        let d = Mandelbulb::default().distance(Vec3::ZERO);
        assert!(d.is_finite());
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_inside_is_negative() {
        let bulb = Mandelbulb::default();
        assert!(bulb.distance(Vec3::new(0.5, 0.0, 0.0)) < 0.0);
        assert!(bulb.distance(Vec3::splat(0.3)) < 0.0);
    }

    #[test]
    fn test_outside_is_positive() {
        let bulb = Mandelbulb::default();
        let d = bulb.distance(Vec3::new(3.0, 0.0, 0.0));
        assert!((d - 1.6478).abs() < 1e-3, "got {d}");
        assert!(bulb.distance(Vec3::new(2.0, 0.0, 0.0)) > 0.5);
    }

    #[test]
    fn test_far_point_does_not_overflow() {
        let d = Mandelbulb::default().distance(Vec3::new(1000.0, 0.0, 0.0));
        assert!(d.is_finite());
        assert!(d > 1000.0);
    }

    #[test]
    fn test_deterministic() {
        let bulb = Mandelbulb::default();
        let p = Vec3::new(0.7, -0.4, 0.9);
        assert_eq!(bulb.distance(p).to_bits(), bulb.distance(p).to_bits());
    }

    #[test]
    fn test_builder_helpers() {
        let bulb = Mandelbulb::new().with_power(4.0).with_iterations(8).with_bailout(64.0);
        assert_eq!(bulb.power, 4.0);
        assert_eq!(bulb.iterations, 8);
        assert_eq!(bulb.bailout, 64.0);
        assert!(bulb.distance(Vec3::new(4.0, 0.0, 0.0)) > 0.0);
    }
}

//! Analytic SDF primitives

use super::DistanceField;
use crate::core::types::Vec3;

/// Sphere with exact Euclidean distance (1-Lipschitz).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub centre: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(centre: Vec3, radius: f32) -> Self {
        Self { centre, radius }
    }

    /// Sphere centred at the origin
    pub fn at_origin(radius: f32) -> Self {
        Self::new(Vec3::ZERO, radius)
    }
}

impl DistanceField for Sphere {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        (p - self.centre).length() - self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_signs() {
        let s = Sphere::at_origin(2.0);
        assert!((s.distance(Vec3::ZERO) + 2.0).abs() < 1e-6);
        assert!(s.distance(Vec3::new(2.0, 0.0, 0.0)).abs() < 1e-6);
        assert!((s.distance(Vec3::new(0.0, 5.0, 0.0)) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_offset_centre() {
        let s = Sphere::new(Vec3::new(2.0, 0.0, 0.0), 1.0);
        // |(0,0,0) - (2,0,0)| - 1 = 1
        assert!((s.distance(Vec3::ZERO) - 1.0).abs() < 1e-6);
    }
}

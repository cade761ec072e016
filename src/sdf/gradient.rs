//! Central-difference gradient of a distance field.

use super::DistanceField;
use crate::core::types::Vec3;

/// Default finite-difference step
pub const GRADIENT_EPSILON: f32 = 1e-4;

/// Unit gradient of `field` at `p` using [`GRADIENT_EPSILON`].
///
/// Returns `None` when the difference vector has no usable direction
/// (zero, collapsed to zero on normalization, or non-finite).
#[inline]
pub fn gradient<F: DistanceField + ?Sized>(field: &F, p: Vec3) -> Option<Vec3> {
    gradient_with_epsilon(field, p, GRADIENT_EPSILON)
}

/// Unit gradient of `field` at `p` with an explicit step size.
pub fn gradient_with_epsilon<F: DistanceField + ?Sized>(
    field: &F,
    p: Vec3,
    epsilon: f32,
) -> Option<Vec3> {
    let dx = Vec3::new(epsilon, 0.0, 0.0);
    let dy = Vec3::new(0.0, epsilon, 0.0);
    let dz = Vec3::new(0.0, 0.0, epsilon);

    let diff = Vec3::new(
        field.distance(p + dx) - field.distance(p - dx),
        field.distance(p + dy) - field.distance(p - dy),
        field.distance(p + dz) - field.distance(p - dz),
    );

    diff.try_normalize()
}

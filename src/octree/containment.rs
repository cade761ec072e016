//! Decides whether the surface can pass through a cube.
//!
//! Three tiers, cheapest first:
//! 1. centre distance beyond the circumscribed sphere: empty
//! 2. centre distance inside the inscribed sphere: keep
//! 3. in between: keep only if the gradient direction stays within the
//!    cube's face extents, `|dir.i| < half_length / d` on every axis
//!
//! Soundness of tier 1 assumes a 1-Lipschitz field. Fractal estimators are
//! not, so tier 3 can prune close to high-curvature detail; that is accepted.
//! Indeterminate inputs (NaN distance, non-positive or NaN extent, no
//! gradient direction) keep the cube, since a spurious node costs memory
//! while a missing one is a hole.

use super::node::NodeGeometry;
use crate::sdf::{gradient_with_epsilon, DistanceField, GRADIENT_EPSILON};

/// sqrt(3), ratio of a cube's circumradius to its half edge
pub const SQRT_3: f32 = 1.732_050_8;

/// Outcome of the containment test, naming the tier that decided it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Containment {
    /// Centre is farther than the circumradius: provably empty
    Outside,
    /// Centre distance is below the half edge: keep
    Inscribed,
    /// Ambiguous band, gradient within face extents: keep
    Aligned,
    /// Ambiguous band, gradient outside face extents: prune
    Misaligned,
    /// NaN distance, degenerate extent or gradient: keep
    Indeterminate,
}

impl Containment {
    /// Whether the cube must be kept (and possibly subdivided)
    pub fn may_intersect(&self) -> bool {
        !matches!(self, Containment::Outside | Containment::Misaligned)
    }
}

/// Whether the surface of `field` may pass through `region`
#[inline]
pub fn may_intersect<F: DistanceField + ?Sized>(field: &F, region: &NodeGeometry) -> bool {
    classify(field, region).may_intersect()
}

/// Classify `region` against `field`
#[inline]
pub fn classify<F: DistanceField + ?Sized>(field: &F, region: &NodeGeometry) -> Containment {
    classify_with_epsilon(field, region, GRADIENT_EPSILON)
}

/// Classify `region` with an explicit gradient step
pub fn classify_with_epsilon<F: DistanceField + ?Sized>(
    field: &F,
    region: &NodeGeometry,
    epsilon: f32,
) -> Containment {
    let half_length = region.half_length;
    let dist = field.distance(region.centre);

    if dist.is_nan() || !(half_length > 0.0) {
        return Containment::Indeterminate;
    }

    // Guarded: only an unambiguously positive distance may prune
    if dist > 0.0 && dist > SQRT_3 * half_length {
        return Containment::Outside;
    }

    // Signed comparison, so any centre inside the surface lands here
    if dist < half_length {
        return Containment::Inscribed;
    }

    // dist >= half_length > 0 here; the ratio is still NaN for inf / inf
    let max_component = half_length / dist;
    if !max_component.is_finite() {
        return Containment::Indeterminate;
    }

    let Some(dir) = gradient_with_epsilon(field, region.centre, epsilon) else {
        return Containment::Indeterminate;
    };

    if dir.x.abs() < max_component
        && dir.y.abs() < max_component
        && dir.z.abs() < max_component
    {
        Containment::Aligned
    } else {
        Containment::Misaligned
    }
}

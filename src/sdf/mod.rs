//! Signed distance fields and their numeric gradient.
//!
//! A field maps a point to a signed scalar: negative inside the surface,
//! magnitude roughly the distance to the nearest surface point. Everything
//! downstream (gradient, containment, builder) only sees the
//! [`DistanceField`] trait, so any field can be swapped in.

pub mod primitives;
pub mod bulb;
pub mod gradient;

pub use primitives::Sphere;
pub use bulb::Mandelbulb;
pub use gradient::{gradient, gradient_with_epsilon, GRADIENT_EPSILON};

use crate::core::types::Vec3;

/// A pure, deterministic signed distance function.
///
/// `Send + Sync` so containment tests for one octree level can run on the
/// rayon pool.
pub trait DistanceField: Send + Sync {
    /// Signed distance from `p` to the surface.
    fn distance(&self, p: Vec3) -> f32;
}

impl<F> DistanceField for F
where
    F: Fn(Vec3) -> f32 + Send + Sync,
{
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        self(p)
    }
}

//! Bulbtree - sparse octree acceleration for raymarching signed distance fields
//!
//! Precomputes which cubes of space the surface of a distance field can pass
//! through, so a raymarcher can skip the rest.
//!
//! ```
//! use bulbtree::octree::{OctreeBuilder, OctreeConfig};
//! use bulbtree::sdf::Sphere;
//! use glam::Vec3;
//!
//! let sphere = Sphere::at_origin(2.0);
//! let config = OctreeConfig::new(Vec3::ZERO, 8.0, 1.0);
//! let tree = OctreeBuilder::new(&sphere, config).unwrap().build();
//! assert_eq!(tree.node_count(), 137);
//! ```

pub mod core;
pub mod sdf;
pub mod octree;
pub mod gpu;
pub mod storage;

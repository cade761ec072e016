//! Sparse octree marking where a distance field's surface may be.
//!
//! Built once, top-down one level at a time, then read-only. The renderer
//! skips every region that ended as a large leaf.

pub mod node;
pub mod config;
pub mod containment;
pub mod tree;
pub mod builder;

pub use node::{ChildLink, NodeGeometry, NodeTopology, CHILD_COUNT};
pub use config::OctreeConfig;
pub use containment::{classify, classify_with_epsilon, may_intersect, Containment};
pub use tree::{OctreeStats, SdfOctree};
pub use builder::{LevelBuild, LevelReport, OctreeBuilder};

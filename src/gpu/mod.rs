//! GPU-side layout of built octrees.
//!
//! Core records stay unpadded; this module produces the padded, `Pod`
//! records a storage-buffer consumer expects.

pub mod layout;

pub use layout::{
    pack_octree, GpuNodeGeometry, GpuNodeTopology, GpuOctreeParams, PackedOctree,
    GPU_LEAF_SENTINEL,
};

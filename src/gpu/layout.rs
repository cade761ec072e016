//! std430 records for the octree storage buffers

use bytemuck::{Pod, Zeroable};

use crate::octree::{NodeGeometry, NodeTopology, SdfOctree};

/// `first_child` value marking a leaf in [`GpuNodeTopology`].
///
/// Unambiguous on the GPU side because the root (index 0) is never a child.
pub const GPU_LEAF_SENTINEL: u32 = 0;

/// Node linkage (8 bytes, binding 0)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct GpuNodeTopology {
    pub parent: u32,
    /// First of 8 contiguous children, or [`GPU_LEAF_SENTINEL`]
    pub first_child: u32,
}

impl From<&NodeTopology> for GpuNodeTopology {
    fn from(node: &NodeTopology) -> Self {
        Self {
            parent: node.parent,
            first_child: node.first_child().unwrap_or(GPU_LEAF_SENTINEL),
        }
    }
}

/// Node cube (32 bytes, binding 1).
///
/// A WGSL/GLSL `vec3<f32>` is 16-byte aligned in storage buffers, so the
/// centre and the half length each take a 16-byte slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuNodeGeometry {
    pub centre: [f32; 3],
    _pad0: f32,
    pub half_length: f32,
    _pad1: [f32; 3],
}

impl GpuNodeGeometry {
    pub fn new(centre: [f32; 3], half_length: f32) -> Self {
        Self { centre, _pad0: 0.0, half_length, _pad1: [0.0; 3] }
    }
}

impl From<&NodeGeometry> for GpuNodeGeometry {
    fn from(node: &NodeGeometry) -> Self {
        Self::new(node.centre.to_array(), node.half_length)
    }
}

/// Constants the renderer needs to walk the tree (32 bytes, uniform)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuOctreeParams {
    pub root_centre: [f32; 3],
    pub root_half_length: f32,
    pub min_leaf_size: f32,
    pub node_count: u32,
    pub max_depth: u32,
    _pad: u32,
}

/// A tree converted to upload-ready buffers
#[derive(Clone, Debug)]
pub struct PackedOctree {
    pub params: GpuOctreeParams,
    pub topology: Vec<GpuNodeTopology>,
    pub geometry: Vec<GpuNodeGeometry>,
}

impl PackedOctree {
    pub fn params_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.params)
    }

    pub fn topology_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.topology)
    }

    pub fn geometry_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.geometry)
    }
}

/// Convert a built tree into GPU layout
pub fn pack_octree(tree: &SdfOctree) -> PackedOctree {
    let topology: Vec<GpuNodeTopology> = tree.topology().iter().map(GpuNodeTopology::from).collect();
    let geometry: Vec<GpuNodeGeometry> = tree.geometry().iter().map(GpuNodeGeometry::from).collect();

    let params = GpuOctreeParams {
        root_centre: tree.root().centre.to_array(),
        root_half_length: tree.root_half_length(),
        min_leaf_size: tree.min_leaf_size(),
        node_count: tree.node_count() as u32,
        max_depth: tree.stats().max_depth,
        _pad: 0,
    };

    log::debug!(
        "Packed {} nodes: {} topology bytes, {} geometry bytes",
        topology.len(),
        topology.len() * std::mem::size_of::<GpuNodeTopology>(),
        geometry.len() * std::mem::size_of::<GpuNodeGeometry>()
    );

    PackedOctree { params, topology, geometry }
}

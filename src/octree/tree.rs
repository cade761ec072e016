//! SDF octree container

use std::ops::Range;

use super::node::{ChildLink, NodeGeometry, NodeTopology, CHILD_COUNT};
use crate::core::{Error, Result};
use crate::core::types::Vec3;

/// Octree over the regions of space a distance field's surface may cross.
///
/// Topology and geometry are parallel arrays indexed identically; the root
/// is at index 0. Arrays only grow, children are appended as one block of 8,
/// and every parent precedes its children.
#[derive(Clone, Debug, PartialEq)]
pub struct SdfOctree {
    topology: Vec<NodeTopology>,
    geometry: Vec<NodeGeometry>,
    /// Minimum cell size the tree was built with
    min_leaf_size: f32,
}

/// Summary of a built tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
    pub node_count: usize,
    pub leaf_count: usize,
    pub internal_count: usize,
    /// Depth of the deepest node (root = 0)
    pub max_depth: u32,
    /// Number of nodes at each depth
    pub nodes_per_depth: Vec<usize>,
}

impl SdfOctree {
    /// Tree holding only the root leaf
    pub fn new(root: NodeGeometry, min_leaf_size: f32) -> Self {
        Self::with_capacity(root, min_leaf_size, 1)
    }

    /// Root-only tree with room for `capacity` nodes
    pub fn with_capacity(root: NodeGeometry, min_leaf_size: f32, capacity: usize) -> Self {
        let mut topology = Vec::with_capacity(capacity.max(1));
        let mut geometry = Vec::with_capacity(capacity.max(1));
        topology.push(NodeTopology::root());
        geometry.push(root);
        Self { topology, geometry, min_leaf_size }
    }

    /// Reassemble a tree from raw arrays, checking every structural invariant
    pub fn from_parts(
        topology: Vec<NodeTopology>,
        geometry: Vec<NodeGeometry>,
        min_leaf_size: f32,
    ) -> Result<Self> {
        if topology.is_empty() {
            return Err(Error::InvalidTree("tree has no root".into()));
        }
        if topology.len() != geometry.len() {
            return Err(Error::InvalidTree(format!(
                "topology has {} nodes but geometry has {}",
                topology.len(), geometry.len()
            )));
        }
        if topology.len() > u32::MAX as usize {
            return Err(Error::InvalidTree(format!("{} nodes exceed u32 indexing", topology.len())));
        }
        if !(min_leaf_size.is_finite() && min_leaf_size > 0.0) {
            return Err(Error::InvalidTree(format!("invalid min_leaf_size {min_leaf_size}")));
        }
        if topology[0].parent != 0 {
            return Err(Error::InvalidTree(format!(
                "root parent must be 0, got {}", topology[0].parent
            )));
        }

        let len = topology.len() as u64;
        for (index, node) in topology.iter().enumerate() {
            let index = index as u32;

            if index != 0 {
                let parent = node.parent;
                let claimed = topology
                    .get(parent as usize)
                    .and_then(|p| p.children.children())
                    .is_some_and(|range| range.contains(&index));
                if !claimed {
                    return Err(Error::InvalidTree(format!(
                        "node {index} is not a child of its parent {parent}"
                    )));
                }
            }

            let Some(first) = node.first_child() else { continue };
            if first <= index || first as u64 + CHILD_COUNT as u64 > len {
                return Err(Error::InvalidTree(format!(
                    "node {index} has child block {first}..{} out of order or bounds",
                    first as u64 + CHILD_COUNT as u64
                )));
            }

            let parent_geometry = geometry[index as usize];
            if parent_geometry.half_length <= min_leaf_size {
                return Err(Error::InvalidTree(format!(
                    "node {index} is subdivided at half_length {} <= min_leaf_size {min_leaf_size}",
                    parent_geometry.half_length
                )));
            }
            for code in 0..CHILD_COUNT as u8 {
                let child = (first + code as u32) as usize;
                if geometry[child] != parent_geometry.child(code) {
                    return Err(Error::InvalidTree(format!(
                        "node {child} does not match octant {code} of node {index}"
                    )));
                }
            }
        }

        Ok(Self { topology, geometry, min_leaf_size })
    }

    /// Split into the two raw arrays
    pub fn into_parts(self) -> (Vec<NodeTopology>, Vec<NodeGeometry>) {
        (self.topology, self.geometry)
    }

    /// Append the 8 children of `index` and link them; returns the first
    /// child's index
    pub(crate) fn subdivide(&mut self, index: u32) -> u32 {
        let first_child = self.topology.len() as u32;
        let parent = self.geometry[index as usize];

        self.topology[index as usize].children = ChildLink::Internal { first_child };
        for code in 0..CHILD_COUNT as u8 {
            self.topology.push(NodeTopology::leaf(index));
            self.geometry.push(parent.child(code));
        }

        first_child
    }

    /// Root cube
    pub fn root(&self) -> &NodeGeometry {
        &self.geometry[0]
    }

    pub fn root_half_length(&self) -> f32 {
        self.geometry[0].half_length
    }

    pub fn min_leaf_size(&self) -> f32 {
        self.min_leaf_size
    }

    /// Topology array (for upload)
    pub fn topology(&self) -> &[NodeTopology] {
        &self.topology
    }

    /// Geometry array (for upload)
    pub fn geometry(&self) -> &[NodeGeometry] {
        &self.geometry
    }

    /// Both records of a node
    pub fn node(&self, index: u32) -> (&NodeTopology, &NodeGeometry) {
        (&self.topology[index as usize], &self.geometry[index as usize])
    }

    pub fn node_count(&self) -> usize {
        self.topology.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.topology.iter().filter(|t| t.is_leaf()).count()
    }

    pub fn is_leaf(&self, index: u32) -> bool {
        self.topology[index as usize].is_leaf()
    }

    /// Index range of a node's children, `None` for leaves
    pub fn children(&self, index: u32) -> Option<Range<u32>> {
        self.topology[index as usize].children.children()
    }

    /// Memory held by the two arrays in bytes
    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<NodeTopology>() * self.topology.len()
            + std::mem::size_of::<NodeGeometry>() * self.geometry.len()
    }

    /// Deepest node whose cube contains `p`, or `None` outside the root
    pub fn locate(&self, p: Vec3) -> Option<u32> {
        if !self.root().contains_point(p) {
            return None;
        }

        let mut index = 0u32;
        while let Some(first) = self.topology[index as usize].first_child() {
            let octant = self.geometry[index as usize].octant_of(p);
            index = first + octant as u32;
        }
        Some(index)
    }

    /// Depth of every node, indexed like the arrays
    pub fn depths(&self) -> Vec<u32> {
        let mut depths = vec![0u32; self.topology.len()];
        // Parents always precede children
        for index in 1..self.topology.len() {
            depths[index] = depths[self.topology[index].parent as usize] + 1;
        }
        depths
    }

    pub fn stats(&self) -> OctreeStats {
        let depths = self.depths();
        let max_depth = depths.iter().copied().max().unwrap_or(0);

        let mut nodes_per_depth = vec![0usize; max_depth as usize + 1];
        for depth in &depths {
            nodes_per_depth[*depth as usize] += 1;
        }

        let leaf_count = self.leaf_count();
        OctreeStats {
            node_count: self.node_count(),
            leaf_count,
            internal_count: self.node_count() - leaf_count,
            max_depth,
            nodes_per_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_tree() -> SdfOctree {
        let mut tree = SdfOctree::new(NodeGeometry::new(Vec3::ZERO, 4.0), 0.5);
        let first = tree.subdivide(0);
        tree.subdivide(first + 7);
        tree
    }

    #[test]
    fn test_new_has_root_only() {
        let tree = SdfOctree::new(NodeGeometry::new(Vec3::ONE, 2.0), 0.1);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.root_half_length(), 2.0);
        assert_eq!(tree.root().centre, Vec3::ONE);
        assert_eq!(tree.topology()[0], NodeTopology::root());
    }

    #[test]
    fn test_subdivide_appends_block() {
        let tree = two_level_tree();
        assert_eq!(tree.node_count(), 17);
        assert_eq!(tree.topology().len(), tree.geometry().len());
        assert_eq!(tree.children(0), Some(1..9));
        assert_eq!(tree.children(8), Some(9..17));
        assert!(tree.is_leaf(1));
        for child in 9..17 {
            let (topo, geo) = tree.node(child);
            assert_eq!(topo.parent, 8);
            assert_eq!(geo.half_length, 1.0);
        }
    }

    #[test]
    fn test_locate() {
        let tree = two_level_tree();
        // Node 8 is the +x+y+z octant, centre (2,2,2); its 7th child is at (3,3,3)
        assert_eq!(tree.locate(Vec3::splat(3.0)), Some(16));
        assert_eq!(tree.locate(Vec3::splat(-3.0)), Some(1));
        assert_eq!(tree.locate(Vec3::new(5.0, 0.0, 0.0)), None);
        let leaf = tree.locate(Vec3::new(1.5, 0.5, 3.9)).expect("inside root");
        assert!(tree.is_leaf(leaf));
        assert!(tree.node(leaf).1.contains_point(Vec3::new(1.5, 0.5, 3.9)));
    }

    #[test]
    fn test_stats() {
        let stats = two_level_tree().stats();
        assert_eq!(stats.node_count, 17);
        assert_eq!(stats.internal_count, 2);
        assert_eq!(stats.leaf_count, 15);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.nodes_per_depth, vec![1, 8, 8]);
    }

    #[test]
    fn test_parts_round_trip() {
        let tree = two_level_tree();
        let (topology, geometry) = tree.clone().into_parts();
        let rebuilt = SdfOctree::from_parts(topology, geometry, 0.5).expect("valid tree");
        assert_eq!(rebuilt, tree);
    }

    #[test]
    fn test_from_parts_rejects_mismatched_lengths() {
        let (topology, mut geometry) = two_level_tree().into_parts();
        geometry.pop();
        assert!(matches!(
            SdfOctree::from_parts(topology, geometry, 0.5),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_from_parts_rejects_bad_links() {
        let (mut topology, geometry) = two_level_tree().into_parts();
        topology[3].parent = 2;
        assert!(SdfOctree::from_parts(topology, geometry.clone(), 0.5).is_err());

        let (mut topology, _) = two_level_tree().into_parts();
        topology[8].children = ChildLink::Internal { first_child: 12 };
        assert!(SdfOctree::from_parts(topology, geometry, 0.5).is_err());
    }

    #[test]
    fn test_from_parts_rejects_wrong_child_geometry() {
        let (topology, mut geometry) = two_level_tree().into_parts();
        geometry[5].half_length = 3.0;
        assert!(SdfOctree::from_parts(topology, geometry, 0.5).is_err());
    }

    #[test]
    fn test_from_parts_rejects_split_below_min_leaf() {
        let (topology, geometry) = two_level_tree().into_parts();
        // Node 8 has half_length 2.0
        assert!(SdfOctree::from_parts(topology, geometry, 2.0).is_err());
    }

    #[test]
    fn test_from_parts_rejects_empty() {
        assert!(SdfOctree::from_parts(Vec::new(), Vec::new(), 1.0).is_err());
    }
}

//! Octree node records.
//!
//! A node is split across two records stored in parallel arrays: topology
//! (who is my parent, where are my children) and geometry (which cube do I
//! cover). Both are plain, unpadded Rust values; GPU alignment lives in
//! [`crate::gpu`].

use std::ops::Range;

use crate::core::types::Vec3;

/// Number of children of a subdivided node
pub const CHILD_COUNT: u32 = 8;

/// Child linkage of a node.
///
/// Children always occupy a contiguous block of [`CHILD_COUNT`] slots, in
/// octant order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChildLink {
    /// Terminal node: too small, or proven empty
    #[default]
    Leaf,
    /// Subdivided node whose children start at `first_child`
    Internal { first_child: u32 },
}

impl ChildLink {
    pub fn is_leaf(&self) -> bool {
        matches!(self, ChildLink::Leaf)
    }

    pub fn first_child(&self) -> Option<u32> {
        match *self {
            ChildLink::Leaf => None,
            ChildLink::Internal { first_child } => Some(first_child),
        }
    }

    /// Index range of the 8 children
    pub fn children(&self) -> Option<Range<u32>> {
        self.first_child().map(|first| first..first + CHILD_COUNT)
    }
}

/// Parent/child linkage of a node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeTopology {
    /// Index of the parent node; the root is its own parent
    pub parent: u32,
    pub children: ChildLink,
}

impl NodeTopology {
    /// Topology of the root node (index 0)
    pub const fn root() -> Self {
        Self { parent: 0, children: ChildLink::Leaf }
    }

    /// A fresh leaf under `parent`
    pub const fn leaf(parent: u32) -> Self {
        Self { parent, children: ChildLink::Leaf }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_leaf()
    }

    pub fn first_child(&self) -> Option<u32> {
        self.children.first_child()
    }
}

/// Axis-aligned cube covered by a node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
    pub centre: Vec3,
    pub half_length: f32,
}

impl NodeGeometry {
    pub fn new(centre: Vec3, half_length: f32) -> Self {
        Self { centre, half_length }
    }

    /// Corner offset of an octant: bit 0 = x, bit 1 = y, bit 2 = z
    #[inline]
    pub fn octant_offset(code: u8) -> Vec3 {
        debug_assert!(code < 8);
        Vec3::new(
            (code & 1) as f32,
            ((code >> 1) & 1) as f32,
            ((code >> 2) & 1) as f32,
        )
    }

    /// Geometry of the child in octant `code`
    #[inline]
    pub fn child(&self, code: u8) -> NodeGeometry {
        let child_half = self.half_length / 2.0;
        let child_base = self.centre - Vec3::splat(child_half);
        NodeGeometry {
            centre: child_base + Self::octant_offset(code) * child_half * 2.0,
            half_length: child_half,
        }
    }

    /// All 8 children in octant order
    pub fn children(&self) -> [NodeGeometry; 8] {
        std::array::from_fn(|code| self.child(code as u8))
    }

    /// Octant of this cube that `p` falls in (ties go to the positive side)
    #[inline]
    pub fn octant_of(&self, p: Vec3) -> u8 {
        (p.x >= self.centre.x) as u8
            | ((p.y >= self.centre.y) as u8) << 1
            | ((p.z >= self.centre.z) as u8) << 2
    }

    /// Radius of the sphere through the cube's corners
    pub fn circumradius(&self) -> f32 {
        self.half_length * super::containment::SQRT_3
    }

    pub fn min(&self) -> Vec3 {
        self.centre - Vec3::splat(self.half_length)
    }

    pub fn max(&self) -> Vec3 {
        self.centre + Vec3::splat(self.half_length)
    }

    /// Inclusive point test
    pub fn contains_point(&self, p: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x && p.x <= max.x &&
        p.y >= min.y && p.y <= max.y &&
        p.z >= min.z && p.z <= max.z
    }
}

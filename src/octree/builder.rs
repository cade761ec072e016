//! Level-by-level octree construction from a distance field.
//!
//! The builder keeps an explicit frontier of node indices. Each level decides
//! for the whole frontier whether a node splits (in parallel when the
//! frontier is large), then appends the children in frontier order and makes
//! them the next frontier. Appending in frontier order keeps serial and
//! parallel builds identical.

use std::time::Instant;

use rayon::prelude::*;

use super::config::OctreeConfig;
use super::containment::may_intersect;
use super::node::CHILD_COUNT;
use super::tree::SdfOctree;
use crate::core::Result;
use crate::sdf::DistanceField;

/// Largest node count addressable by u32 indices, the default node limit
const MAX_NODE_COUNT: usize = u32::MAX as usize;

/// What one level of construction did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelReport {
    /// Depth of the processed frontier (root = 0)
    pub depth: u32,
    /// Frontier nodes examined
    pub processed: usize,
    /// Frontier nodes that were split
    pub subdivided: usize,
    /// Tree size after the level
    pub total_nodes: usize,
}

/// Builds [`SdfOctree`]s for one field and config
pub struct OctreeBuilder<'f, F: DistanceField + ?Sized> {
    field: &'f F,
    config: OctreeConfig,
}

impl<'f, F: DistanceField + ?Sized> OctreeBuilder<'f, F> {
    /// Create a builder; fails if the config is unusable
    pub fn new(field: &'f F, config: OctreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { field, config })
    }

    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Begin a stepwise build seeded with the root node
    pub fn start(&self) -> LevelBuild<'_, F> {
        let root = self.config.root_geometry();
        let tree = SdfOctree::with_capacity(root, self.config.min_leaf_size, 1024);

        LevelBuild {
            field: self.field,
            config: &self.config,
            tree,
            frontier: vec![0],
            depth: 0,
            node_limit: MAX_NODE_COUNT,
        }
    }

    /// Build the whole tree
    pub fn build(&self) -> SdfOctree {
        let start = Instant::now();
        let tree = self.start().finish();

        log::info!(
            "Built octree: {} nodes ({} leaves) in {:.1}ms",
            tree.node_count(),
            tree.leaf_count(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        tree
    }
}

/// An in-progress build that advances one level per [`step`](Self::step).
///
/// Between steps the partial tree is complete and valid: nodes still in the
/// frontier are leaves. Dropping the build early via
/// [`into_tree`](Self::into_tree) is how a build is cancelled.
pub struct LevelBuild<'b, F: DistanceField + ?Sized> {
    field: &'b F,
    config: &'b OctreeConfig,
    tree: SdfOctree,
    frontier: Vec<u32>,
    depth: u32,
    node_limit: usize,
}

impl<'b, F: DistanceField + ?Sized> LevelBuild<'b, F> {
    /// Cap the tree at `limit` nodes (never above `u32::MAX`). Nodes that
    /// would push past it stay leaves.
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = limit.min(MAX_NODE_COUNT);
        self
    }

    /// Depth of the next frontier to process
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Node indices awaiting a decision
    pub fn frontier(&self) -> &[u32] {
        &self.frontier
    }

    pub fn is_complete(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Partial tree as of the last level boundary
    pub fn tree(&self) -> &SdfOctree {
        &self.tree
    }

    /// Process one level; `None` once nothing is left to expand
    pub fn step(&mut self) -> Option<LevelReport> {
        if self.frontier.is_empty() {
            return None;
        }

        let decisions = self.decide();
        let requested = decisions.iter().filter(|&&split| split).count();

        let mut next = Vec::with_capacity(requested * CHILD_COUNT as usize);
        let mut subdivided = 0;
        for (&index, split) in self.frontier.iter().zip(decisions) {
            if !split {
                continue;
            }
            if self.tree.node_count() + CHILD_COUNT as usize > self.node_limit {
                continue;
            }
            let first = self.tree.subdivide(index);
            next.extend(first..first + CHILD_COUNT);
            subdivided += 1;
        }
        if subdivided < requested {
            log::warn!(
                "Octree hit its {} node limit at depth {}, {} nodes left unsplit",
                self.node_limit,
                self.depth,
                requested - subdivided
            );
        }

        let report = LevelReport {
            depth: self.depth,
            processed: self.frontier.len(),
            subdivided,
            total_nodes: self.tree.node_count(),
        };
        log::debug!(
            "Level {}: {}/{} nodes subdivided, {} total",
            report.depth, report.subdivided, report.processed, report.total_nodes
        );

        self.frontier = next;
        self.depth += 1;
        Some(report)
    }

    /// Run the remaining levels and return the finished tree
    pub fn finish(mut self) -> SdfOctree {
        while self.step().is_some() {}
        self.tree
    }

    /// Stop here and keep the partial tree
    pub fn into_tree(self) -> SdfOctree {
        if !self.frontier.is_empty() {
            log::debug!(
                "Build stopped at depth {} with {} unexpanded nodes",
                self.depth,
                self.frontier.len()
            );
        }
        self.tree
    }

    /// Split decision for every frontier node, in frontier order
    fn decide(&self) -> Vec<bool> {
        let field = self.field;
        let geometry = self.tree.geometry();
        let min_leaf_size = self.config.min_leaf_size;

        let should_split = |&index: &u32| {
            let region = &geometry[index as usize];
            region.half_length > min_leaf_size && may_intersect(field, region)
        };

        let threshold = self.config.parallel_threshold.max(1);
        if self.config.parallel && self.frontier.len() >= threshold {
            self.frontier.par_iter().map(should_split).collect()
        } else {
            self.frontier.iter().map(should_split).collect()
        }
    }
}

impl<'b, F: DistanceField + ?Sized> Iterator for LevelBuild<'b, F> {
    type Item = LevelReport;

    fn next(&mut self) -> Option<LevelReport> {
        self.step()
    }
}
